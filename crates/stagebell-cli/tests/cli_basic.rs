//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "stagebell-cli", "--"])
        .args(args)
        .env("STAGEBELL_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_list_is_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.get("total_time").is_some());
    assert!(parsed.get("sounds").is_some());
}

#[test]
fn test_config_path_prints_location() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn test_config_set_then_get() {
    let (_, _, code) = run_cli(&["config", "set", "random_reminder.min", "4"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&["config", "get", "random_reminder.min"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "4");

    let (_, _, code) = run_cli(&["config", "reset"]);
    assert_eq!(code, 0, "config reset failed");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_sounds_list() {
    let (_, _, code) = run_cli(&["sounds", "init"]);
    assert_eq!(code, 0, "sounds init failed");
    let (stdout, _, code) = run_cli(&["sounds", "list"]);
    assert_eq!(code, 0, "sounds list failed");
    assert!(stdout.contains("notis:"));
    assert!(stdout.contains("pause:"));
}

#[test]
fn test_run_short_session_completes() {
    let (stdout, _, code) = run_cli(&[
        "run",
        "--total",
        "3",
        "--stage",
        "3",
        "--reminder-min",
        "2",
        "--reminder-max",
        "2",
        "--short-break",
        "1",
        "--stage-break",
        "1",
        "--no-sound",
    ]);
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("session complete"));
}

#[test]
fn test_run_json_emits_snapshots() {
    let (stdout, _, code) = run_cli(&[
        "run",
        "--total",
        "2",
        "--stage",
        "2",
        "--reminder-min",
        "1",
        "--reminder-max",
        "1",
        "--short-break",
        "1",
        "--stage-break",
        "1",
        "--no-sound",
        "--json",
    ]);
    assert_eq!(code, 0, "run --json failed");
    let first = stdout.lines().next().expect("no output");
    let parsed: serde_json::Value = serde_json::from_str(first).unwrap();
    assert!(parsed.get("total_remaining").is_some());
}

#[test]
fn test_run_rejects_invalid_config() {
    let (_, stderr, code) = run_cli(&["run", "--total", "0", "--no-sound"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("total_secs"));
}

#[test]
fn test_completions_bash() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("stagebell"));
}
