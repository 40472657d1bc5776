use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn top_level_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("gatecastctl");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for command in ["check", "simulate", "blocks"] {
        assert!(text.contains(command), "help missing '{command}'");
    }
}

#[test]
fn simulate_help_mentions_options() {
    let mut cmd = cargo_bin_cmd!("gatecastctl");
    let output = cmd
        .arg("simulate")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for flag in ["--config", "--client", "--activate-after", "--speed"] {
        assert!(text.contains(flag), "simulate help missing {flag}");
    }
}

#[test]
fn blocks_subcommands_present() {
    let mut cmd = cargo_bin_cmd!("gatecastctl");
    cmd.arg("blocks")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("clear")));
}

#[test]
fn check_reports_source_and_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("funnel.toml");
    fs::write(
        &path,
        r#"
[playback]
max_silent_retries = 0

[[steps]]
route = "/"
backend = { kind = "simulated", duration = "3s" }
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("gatecastctl");
    cmd.current_dir(dir.path())
        .arg("check")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("source:")
                .and(predicate::str::contains("Warnings:"))
                .and(predicate::str::contains("max_silent_retries is 0")),
        );
}

#[test]
fn check_fails_on_guard_rail_violation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("funnel.json");
    fs::write(
        &path,
        r#"{"steps":[{"route":"/","backend":{"kind":"simulated","duration":"0s"}}]}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("gatecastctl");
    cmd.current_dir(dir.path())
        .arg("check")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be longer than zero"));
}

#[test]
fn simulate_runs_a_short_funnel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("funnel.toml");
    fs::write(
        &path,
        r#"
[[steps]]
route = "/"
backend = { kind = "simulated", duration = "1s" }
next = { link = "https://esempio-questionario.com/" }
popup = "on_reveal"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("gatecastctl");
    cmd.current_dir(dir.path())
        .arg("simulate")
        .arg("--config")
        .arg(&path)
        .args(["--memory-store", "--activate-after", "0", "--speed", "100"])
        .args(["--client", "192.168.1.5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("client: 192.168.1.5").and(
                predicate::str::contains(
                    "outcome: completed on /, opened https://esempio-questionario.com/",
                ),
            ),
        );
}

#[test]
fn blocks_list_on_an_empty_store() {
    let dir = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("gatecastctl");
    cmd.current_dir(dir.path())
        .args(["blocks", "list", "--store"])
        .arg(dir.path().join("blocks.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("no access blocks"));
}
