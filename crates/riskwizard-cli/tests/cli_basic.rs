//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command with `HOME` pointed at `home` and return output.
fn run_cli_in(home: &std::path::Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "riskwizard-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("N8N_WEBHOOK_URL")
        .env_remove("PORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let home = tempfile::tempdir().unwrap();
    run_cli_in(home.path(), args, "")
}

#[test]
fn test_catalog_text() {
    let (stdout, _, code) = run_cli(&["catalog"]);
    assert_eq!(code, 0, "catalog failed");
    assert!(stdout.contains("Customer Experience"));
    assert!(stdout.contains("30 questions, maximum total score 90"));
}

#[test]
fn test_catalog_json() {
    let (stdout, _, code) = run_cli(&["catalog", "--json"]);
    assert_eq!(code, 0, "catalog --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["categories"].as_array().unwrap().len(), 6);
}

#[test]
fn test_score_prints_payload() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("answers.json");
    std::fs::write(&sheet, r#"{"systems_q4": 3, "shipping_q1": 1}"#).unwrap();

    let (stdout, _, code) = run_cli(&[
        "score",
        "--answers",
        sheet.to_str().unwrap(),
        "--email",
        "a@b.com",
    ]);
    assert_eq!(code, 0, "score failed");
    let payload: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(payload["email"], "a@b.com");
    assert_eq!(payload["totalScore"], 4);
    assert_eq!(payload["maxScore"], 90);
    assert_eq!(payload["categoryScores"]["systems"]["score"], 3);
}

#[test]
fn test_score_rejects_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("answers.json");
    std::fs::write(&sheet, r#"{"systems_q4": 4}"#).unwrap();

    let (_, stderr, code) = run_cli(&["score", "--answers", sheet.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid score 4"));
}

#[test]
fn test_config_set_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "server.port", "8088"], "");
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli_in(home.path(), &["config", "get", "server.port"], "");
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "8088");
}

#[test]
fn test_run_dry_run_quits_cleanly() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_in(
        home.path(),
        &["run", "--dry-run", "--email", "a@b.com"],
        "quit\n",
    );
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("a@b.com"));
}
