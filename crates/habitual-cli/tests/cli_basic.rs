//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated HABITUAL_HOME and verify
//! outputs, exit codes and the persisted store.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `home` and return (stdout, stderr, code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitual"))
        .args(args)
        .env("HABITUAL_HOME", home)
        .env_remove("HABITUAL_STORE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and expect success.
fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed with code {code}: {args:?}\n{stderr}");
    stdout
}

fn setup() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["init"]);
    run_cli_success(
        home.path(),
        &["habit", "add", "diary", "--name", "Write diary", "--description", "One paragraph"],
    );
    run_cli_success(
        home.path(),
        &["habit", "add", "memory-check", "--name", "Memory check"],
    );
    home
}

fn load_store(home: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(home.join("habits.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_init_creates_store_and_config() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["init"]);
    assert!(stdout.contains("Initialized habit store"));
    assert!(home.path().join("habits.json").exists());
    assert!(home.path().join("config.toml").exists());

    let stdout = run_cli_success(home.path(), &["init"]);
    assert!(stdout.contains("already exists"));
}

#[test]
fn test_complete_then_complete_again() {
    let home = setup();

    let stdout = run_cli_success(home.path(), &["complete", "diary"]);
    assert!(stdout.contains("streak 1, weight 1.10"), "{stdout}");

    let stdout = run_cli_success(home.path(), &["complete", "diary"]);
    assert!(stdout.contains("already completed"), "{stdout}");

    let store = load_store(home.path());
    assert_eq!(store["habits"]["diary"]["streak"], 1);
    assert_eq!(store["habits"]["diary"]["weight"], 1.1);
    assert!(store["meta"]["lastUpdated"].is_string());
}

#[test]
fn test_complete_unknown_habit_fails() {
    let home = setup();
    let (_, stderr, code) = run_cli(home.path(), &["complete", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Habit not found: nope"));
}

#[test]
fn test_missing_store_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["status"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("IO error"));
}

#[test]
fn test_negative_feedback_json() {
    let home = setup();
    let stdout = run_cli_success(
        home.path(),
        &["feedback", "memory-check", "--negative", "--note", "forgot", "--format", "json"],
    );
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["weight"], 0.9);
    assert_eq!(outcome["negative"], 1);
    assert_eq!(outcome["score"], -1.0);

    let store = load_store(home.path());
    assert_eq!(store["habits"]["memory-check"]["feedback"]["history"][0]["note"], "forgot");
}

#[test]
fn test_feedback_requires_polarity() {
    let home = setup();
    let (_, _, code) = run_cli(home.path(), &["feedback", "diary"]);
    assert_eq!(code, 2);

    let (_, _, code) = run_cli(home.path(), &["feedback", "diary", "--positive", "--negative"]);
    assert_eq!(code, 2);
}

#[test]
fn test_feedback_report_orders_by_net() {
    let home = setup();
    run_cli_success(home.path(), &["feedback", "memory-check", "--negative"]);
    run_cli_success(home.path(), &["feedback", "diary", "--positive", "--note", "clear head"]);

    let stdout = run_cli_success(home.path(), &["feedback-report", "--format", "json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report[0]["id"], "diary");
    assert_eq!(report[1]["id"], "memory-check");
    assert_eq!(report[0]["recent"][0]["note"], "clear head");
}

#[test]
fn test_status_sorted_by_weight() {
    let home = setup();
    run_cli_success(home.path(), &["complete", "memory-check"]);

    let stdout = run_cli_success(home.path(), &["status", "--format", "json"]);
    let habits: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(habits[0]["id"], "memory-check");
    assert_eq!(habits[1]["id"], "diary");

    let stdout = run_cli_success(home.path(), &["status", "--format", "markdown"]);
    assert!(stdout.starts_with("## Habits"));
}

#[test]
fn test_summary_formats() {
    let home = setup();
    run_cli_success(home.path(), &["complete", "diary"]);

    let stdout = run_cli_success(home.path(), &["summary"]);
    assert!(stdout.contains("Completion rate: 50.0% (1/2 daily habits)"), "{stdout}");

    let stdout = run_cli_success(home.path(), &["summary", "--format", "json"]);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["completed_today"], 1);
    assert_eq!(summary["streak_leader"]["id"], "diary");

    let (_, _, code) = run_cli(home.path(), &["summary", "--format", "html"]);
    assert_eq!(code, 2);
}

#[test]
fn test_habit_add_duplicate_and_remove() {
    let home = setup();
    let (_, stderr, code) = run_cli(home.path(), &["habit", "add", "diary", "--name", "Again"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));

    run_cli_success(home.path(), &["habit", "remove", "diary"]);
    let stdout = run_cli_success(home.path(), &["habit", "list"]);
    assert!(!stdout.contains("diary"));
    assert!(stdout.contains("memory-check"));
}

#[test]
fn test_config_get_set() {
    let home = setup();
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "decay.threshold_hours"]).trim(),
        "24"
    );
    run_cli_success(home.path(), &["config", "set", "display.default_format", "json"]);

    let stdout = run_cli_success(home.path(), &["summary"]);
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());

    let (_, _, code) = run_cli(home.path(), &["config", "get", "decay.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions_script() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["completions", "bash"]);
    assert!(stdout.contains("habitual"));
}
