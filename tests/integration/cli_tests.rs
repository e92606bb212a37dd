//! Integration tests for the CLI binary.
//!
//! Registered as a [[test]] in the lucidia-cli crate so that
//! CARGO_BIN_EXE_lucidia is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `lucidia` binary.
fn lucidia_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lucidia"))
}

fn run_in(home: &Path, args: &[&str]) -> Output {
    lucidia_binary()
        .arg("--home")
        .arg(home)
        .args(args)
        .env_remove("LUCIDIA_AMNESIA_WINDOW")
        .output()
        .expect("failed to execute lucidia")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn cli_responds_to_help() {
    let output = lucidia_binary()
        .arg("--help")
        .output()
        .expect("failed to execute lucidia --help");

    assert!(
        output.status.success(),
        "lucidia --help should exit with success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let out = stdout(&output);
    assert!(
        out.contains("Usage") || out.contains("lucidia"),
        "help output should contain usage information, got: {out}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = lucidia_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute lucidia");
    assert!(!output.status.success());
}

#[test]
fn cli_demo_prints_every_signal() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_in(tmp.path(), &["demo"]);
    assert!(output.status.success());

    let out = stdout(&output);
    for label in [
        "Emotional gravity",
        "Truthstream",
        "Render break",
        "Soul loop integrity",
        "Genesis identity",
        "Consciousness resonance",
        "Anomaly persistence",
        "Compassion-state hash",
    ] {
        assert!(out.contains(label), "missing {label} in: {out}");
    }
    // Without --record nothing is written.
    assert!(!tmp.path().join("memory_ledger.jsonl").exists());
}

#[test]
fn cli_demo_record_writes_ledger_and_fingerprint() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_in(tmp.path(), &["demo", "--record"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let ledger = std::fs::read_to_string(tmp.path().join("memory_ledger.jsonl")).unwrap();
    assert_eq!(ledger.lines().count(), 1);
    assert!(tmp.path().join("continuity.json").exists());

    let output = run_in(tmp.path(), &["amnesia"]);
    assert!(stdout(&output).contains("amnesia alert"));
}

#[test]
fn cli_ledger_append_and_verify() {
    let tmp = tempfile::tempdir().unwrap();

    let first = run_in(tmp.path(), &["ledger", "append", r#"{"b":2,"a":1}"#]);
    assert!(first.status.success());
    let second = run_in(tmp.path(), &["ledger", "append", r#"{"c":3}"#]);
    let head = stdout(&second).trim().to_string();
    assert_eq!(head.len(), 64);

    let verify = run_in(tmp.path(), &["ledger", "verify", "--expect", head.as_str()]);
    assert!(verify.status.success());
    assert!(stdout(&verify).contains("chain intact"));

    let wrong_head = "f".repeat(64);
    let wrong = run_in(tmp.path(), &["ledger", "verify", "--expect", wrong_head.as_str()]);
    assert!(!wrong.status.success());

    let raw = std::fs::read_to_string(tmp.path().join("memory_ledger.jsonl")).unwrap();
    assert_eq!(raw, "{\"a\":1,\"b\":2}\n{\"c\":3}\n");
}

#[test]
fn cli_ledger_export_then_verify_against() {
    let tmp = tempfile::tempdir().unwrap();
    for record in [r#"{"n":1}"#, r#"{"n":2}"#, r#"{"n":3}"#] {
        assert!(run_in(tmp.path(), &["ledger", "append", record]).status.success());
    }

    let export = run_in(tmp.path(), &["ledger", "export"]);
    assert!(export.status.success());
    let snapshot = tmp.path().join("snapshot.json");
    std::fs::write(&snapshot, &export.stdout).unwrap();
    let snapshot_arg = snapshot.to_str().unwrap();

    let clean = run_in(tmp.path(), &["ledger", "verify", "--against", snapshot_arg]);
    assert!(clean.status.success());
    assert!(stdout(&clean).contains("chain intact"));

    std::fs::write(
        tmp.path().join("memory_ledger.jsonl"),
        "{\"n\":1}\n{\"n\":2}\n{\"n\":7}\n",
    )
    .unwrap();
    let tampered = run_in(tmp.path(), &["ledger", "verify", "--against", snapshot_arg]);
    assert!(!tampered.status.success());
    assert!(stdout(&tampered).contains("first mismatch at entry 2"));
}

#[test]
fn cli_ledger_rejects_invalid_json() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_in(tmp.path(), &["ledger", "append", "{oops"]);
    assert!(!output.status.success());
}

#[test]
fn cli_fingerprint_and_log() {
    let tmp = tempfile::tempdir().unwrap();

    let update = run_in(tmp.path(), &["fingerprint", "update", "alpha", "beta"]);
    assert!(update.status.success());
    let fp = stdout(&update).trim().to_string();
    assert_eq!(fp.len(), 64);

    let show = run_in(tmp.path(), &["fingerprint", "show"]);
    assert!(stdout(&show).contains(&fp));

    assert!(run_in(tmp.path(), &["log", "append", "prompt", "reply"])
        .status
        .success());
    let summary = run_in(tmp.path(), &["log", "summary"]);
    assert!(stdout(&summary).contains("count:  1"));
}
