//! Integration tests for the `jot` CLI.
//!
//! Each test creates a temp directory holding a `.jot/` data directory,
//! runs `jot` as a subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `jot` binary.
fn jot_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("jot");
    path
}

const TASKS: &str = r#"[
  {"id": 1, "text": "buy milk", "done": false},
  {"id": 2, "text": "walk dog", "done": true},
  {"id": 3, "text": "Milk the cow", "done": false}
]"#;

/// Create `.jot/tasks.json` under `root`.
fn create_data_dir(root: &Path, tasks: &str) -> PathBuf {
    let dir = root.join(".jot");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("tasks.json"), tasks).unwrap();
    dir
}

fn run_jot(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(jot_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run jot");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_jot_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_jot(dir, args);
    if !success {
        panic!(
            "jot {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

#[test]
fn list_prints_items_in_stored_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), TASKS);
    let out = run_jot_ok(tmp.path(), &["list"]);
    assert_eq!(out, "[ ] buy milk\n[x] walk dog\n[ ] Milk the cow\n");
}

#[test]
fn list_filters_case_insensitively() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), TASKS);
    let out = run_jot_ok(tmp.path(), &["list", "MILK"]);
    assert_eq!(out, "[ ] buy milk\n[ ] Milk the cow\n");
}

#[test]
fn list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), TASKS);
    let out = run_jot_ok(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["id"], 2);
    assert_eq!(items[1]["text"], "walk dog");
    assert_eq!(items[1]["done"], true);
}

#[test]
fn data_dir_is_found_from_a_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), TASKS);
    let nested = tmp.path().join("src/deeper");
    fs::create_dir_all(&nested).unwrap();
    let out = run_jot_ok(&nested, &["list", "dog"]);
    assert_eq!(out, "[x] walk dog\n");
}

#[test]
fn explicit_data_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let elsewhere = tmp.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    fs::write(
        elsewhere.join("tasks.json"),
        r#"[{"id": 9, "text": "from -C", "done": false}]"#,
    )
    .unwrap();
    let out = run_jot_ok(tmp.path(), &["-C", elsewhere.to_str().unwrap(), "list"]);
    assert_eq!(out, "[ ] from -C\n");
}

#[test]
fn missing_or_unreadable_list_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), "this is not json");
    assert_eq!(run_jot_ok(tmp.path(), &["list"]), "");
    assert_eq!(run_jot_ok(tmp.path(), &["list", "--json"]).trim(), "[]");

    let empty = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(empty.path().join(".jot")).unwrap();
    assert_eq!(run_jot_ok(empty.path(), &["list"]), "");
}

#[test]
fn log_file_is_created() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_data_dir(tmp.path(), TASKS);
    let log = tmp.path().join("jot.log");
    run_jot_ok(tmp.path(), &["--log-file", log.to_str().unwrap(), "list"]);
    assert!(log.exists());
}

#[test]
fn unknown_subcommand_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_jot(tmp.path(), &["frobnicate"]);
    assert!(!success);
    assert!(stderr.contains("frobnicate"));
}
