use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use flags::{AmbiguityFlag, HeightScopeFlag, MatchingFlag};
use solitaire_hierarchy::{OrgChart, OrgChartConfig, StreamFilter};
use std::io;
use std::path::{Path, PathBuf};

mod config;
mod csv;
mod flags;
mod report;

pub use config::{load_config, render_config};
pub use csv::CsvTable;
pub use report::render_outline;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "solitaire")]
#[command(about = "Organization chart planner for people-directory CSV files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with configuration overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full JSON plan: dataset summary, hierarchy, decorations and layout
    Plan(PlanArgs),

    /// Print the resolved hierarchy as a Markdown outline
    Outline(OutlineArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct PlanArgs {
    /// People directory CSV
    csv: PathBuf,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct OutlineArgs {
    /// People directory CSV
    csv: PathBuf,

    #[command(flatten)]
    extract: ExtractArgs,
}

#[derive(Args)]
struct ExtractArgs {
    /// Comma-separated streams to include (names or normalized keys)
    #[arg(long)]
    stream: Option<String>,

    /// Override guest name matching
    #[arg(long, value_enum)]
    matching: Option<MatchingFlag>,

    /// Override the policy for guest names matching several people
    #[arg(long, value_enum)]
    on_ambiguous: Option<AmbiguityFlag>,

    /// Override which teams size the team boxes
    #[arg(long, value_enum)]
    height_scope: Option<HeightScopeFlag>,
}

impl ExtractArgs {
    fn apply(&self, config: &mut OrgChartConfig) {
        if let Some(matching) = self.matching {
            config.name_matching = matching.as_domain();
        }
        if let Some(policy) = self.on_ambiguous {
            config.on_ambiguous_name = policy.as_domain();
        }
        if let Some(scope) = self.height_scope {
            config.layout.team_height_scope = scope.as_domain();
        }
    }

    fn filter(&self) -> Option<StreamFilter> {
        self.stream.as_deref().and_then(StreamFilter::parse)
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan(args) => run_plan(args, config)?,
        Commands::Outline(args) => run_outline(args, config)?,
        Commands::Config => print_stdout(&render_config(&config)?)?,
    }

    Ok(())
}

fn extract(
    csv: &Path,
    args: &ExtractArgs,
    mut config: OrgChartConfig,
) -> Result<(OrgChart, Option<StreamFilter>)> {
    args.apply(&mut config);
    let table = CsvTable::read(csv, &[config.columns.status.as_str()])?;
    let filter = args.filter();
    let chart = OrgChart::extract(&table.headers, &table.rows, &config, filter.as_ref())
        .with_context(|| format!("Failed to build org chart from {}", csv.display()))?;
    Ok((chart, filter))
}

fn run_plan(args: PlanArgs, config: OrgChartConfig) -> Result<()> {
    let (chart, _) = extract(&args.csv, &args.extract, config)?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&chart)?
    } else {
        serde_json::to_string(&chart)?
    };
    print_stdout(&output)
}

fn run_outline(args: OutlineArgs, config: OrgChartConfig) -> Result<()> {
    let (chart, filter) = extract(&args.csv, &args.extract, config)?;
    print_stdout(&render_outline(&chart, filter.as_ref()))
}
