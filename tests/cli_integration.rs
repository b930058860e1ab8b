//! Integration tests for the `carebook` CLI.
//!
//! Each test creates a temp data directory, runs `carebook` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `carebook` binary.
fn carebook_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("carebook");
    path
}

/// Write a data dir with a few records in each collection.
fn create_test_data(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("medications.json"),
        r#"[
  { "id": "MED-1", "name": "Aspirin", "dosage": "81mg", "schedule": "daily", "notes": "" },
  { "id": "MED-2", "name": "Metformin", "dosage": "500mg", "schedule": "twice daily", "notes": "with food" }
]"#,
    )
    .unwrap();
    fs::write(
        dir.join("activities.json"),
        r#"[
  { "id": "ACT-1", "title": "Morning walk", "date": "2025-05-14", "time": "09:00", "template": "TPL-1", "notes": "" }
]"#,
    )
    .unwrap();
    fs::write(
        dir.join("templates.json"),
        r#"[
  { "id": "TPL-1", "title": "Walk", "description": "Around the block", "duration_minutes": "30" }
]"#,
    )
    .unwrap();
}

/// Run `carebook -C <data_dir>` with the given args, returning (stdout, stderr, success).
fn run_cb(data_dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(carebook_bin())
        .arg("-C")
        .arg(data_dir)
        .args(args)
        .env_remove("CAREBOOK_DIR")
        .env_remove("CAREBOOK_LOG")
        .output()
        .expect("failed to run carebook");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `carebook` expecting success, return stdout.
fn run_cb_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_cb(data_dir, args);
    if !success {
        panic!(
            "carebook {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("care");

    let out = run_cb_ok(&data, &["init"]);
    assert!(out.contains("Initialized carebook"));
    let config = fs::read_to_string(data.join("carebook.toml")).unwrap();
    assert!(config.contains("[guard]"));
    assert!(config.contains("init_fallback_ms"));
}

#[test]
fn test_init_twice_fails_without_force() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("care");
    run_cb_ok(&data, &["init"]);

    let (_, stderr, success) = run_cb(&data, &["init"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));

    run_cb_ok(&data, &["init", "--force"]);
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let out = run_cb_ok(tmp.path(), &["list", "medications"]);
    assert_eq!(
        out,
        "MED-1    Aspirin (81mg)\nMED-2    Metformin (500mg)\n"
    );
}

#[test]
fn test_list_empty_collection() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let out = run_cb_ok(tmp.path(), &["list", "users"]);
    assert_eq!(out, "No users.\n");
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let out = run_cb_ok(tmp.path(), &["list", "activities", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["collection"], "activities");
    let records = parsed["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["template"], "TPL-1");
}

#[test]
fn test_list_unknown_collection() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let (_, stderr, success) = run_cb(tmp.path(), &["list", "patients"]);
    assert!(!success);
    assert!(stderr.contains("unknown collection \"patients\""));
}

#[test]
fn test_show_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let out = run_cb_ok(tmp.path(), &["show", "MED-2"]);
    assert!(out.starts_with("medication MED-2\n"));
    assert!(out.contains("  Schedule: twice daily\n"));
    assert!(out.contains("  Notes: with food\n"));
}

#[test]
fn test_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let out = run_cb_ok(tmp.path(), &["show", "TPL-1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["title"], "Walk");
    assert_eq!(parsed["duration_minutes"], "30");
}

#[test]
fn test_show_missing_record() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_data(tmp.path());

    let (_, stderr, success) = run_cb(tmp.path(), &["show", "MED-9"]);
    assert!(!success);
    assert!(stderr.contains("record not found: MED-9"));
}

#[test]
fn test_missing_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (_, stderr, success) = run_cb(&tmp.path().join("absent"), &["list", "users"]);
    assert!(!success);
    assert!(stderr.contains("carebook init"));
}
