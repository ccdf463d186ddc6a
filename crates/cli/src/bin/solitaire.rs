use anyhow::Result;

fn main() -> Result<()> {
    solitaire_cli::main_entry()
}
