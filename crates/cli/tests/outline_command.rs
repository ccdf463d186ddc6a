use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn run_cli(workdir: &Path, args: &[&str]) -> String {
    let output = Command::cargo_bin("solitaire")
        .expect("binary")
        .current_dir(workdir)
        .args(args)
        .output()
        .expect("command run");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    assert!(
        output.status.success(),
        "stdout: {stdout}\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    stdout
}

#[test]
fn outline_renders_markdown() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("people.csv"),
        "Name,Status,Team Stream,Team Theme,Team member of,\
         Team Delivery Manager,Team Stream Description\n\
         Alice,active,Core,Infra,Platform,Bob,Shared platform services\n\
         Bob,active,Core,Infra,Other,,\n\
         Zed,active,,,,,\n",
    )
    .unwrap();

    let md = run_cli(temp.path(), &["--quiet", "outline", "people.csv"]);

    assert!(md.starts_with("# Org chart outline"));
    assert!(md.contains("## Core\n\n> Shared platform services"));
    assert!(md.contains("#### Platform\n\n- Alice\n- Bob _(guest: Team Delivery Manager)_"));
    assert!(md.contains("## No Team Stream"));
    assert!(md.contains("#### No Team member of\n\n- Zed"));
}

#[test]
fn outline_stream_filter_hides_other_streams() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("people.csv"),
        "Name,Status,Team Stream,Team Theme,Team member of\n\
         Alice,active,Core Platform,Infra,Platform\n\
         Bob,active,Edge,Net,Routing\n",
    )
    .unwrap();

    let md = run_cli(temp.path(), &["outline", "people.csv", "--stream", "core-platform"]);

    assert!(md.contains("## Core Platform"));
    assert!(!md.contains("## Edge"));
}

#[test]
fn config_prints_effective_toml() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("solitaire.toml"),
        "on_ambiguous_name = \"skip\"\n\n[columns]\nteam = \"Squad\"\n",
    )
    .unwrap();

    let defaults = run_cli(temp.path(), &["config"]);
    assert!(defaults.contains("on_ambiguous_name = \"first-match\""));
    assert!(defaults.contains("items_per_row = 6"));

    let text = run_cli(temp.path(), &["--config", "solitaire.toml", "config"]);
    assert!(text.contains("on_ambiguous_name = \"skip\""));
    assert!(text.contains("team = \"Squad\""));
    assert!(text.contains("stream = \"Team Stream\""));
}
