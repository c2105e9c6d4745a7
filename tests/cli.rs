//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::process::{Command, Stdio};

const FEATURE_REQUEST: &str = "Fix the login bug and add password reset functionality.";

fn glt() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glt"));
    cmd.env_remove("GLT_RECORD").env_remove("GLT_VOCABULARY").env("RUST_LOG", "off");
    cmd
}

fn run_glt(args: &[&str]) -> std::process::Output {
    glt().args(args).output().expect("failed to run glt binary")
}

fn run_glt_with_stdin(args: &[&str], stdin: &str) -> std::process::Output {
    let mut child = glt()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn glt binary");
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn parse_prints_matched_operation() {
    let output = run_glt(&["parse", "rename", "branches", "from", "master", "to", "main"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("rename-branches"));
    assert!(stdout.contains("new_branch = main"));
}

#[test]
fn parse_json_is_machine_readable() {
    let output = run_glt(&["parse", "--json", "generate", "dashboard", "for", "groups", "1,2,3"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "generate-dashboard");
    assert_eq!(value["parameters"]["group_ids"], "1,2,3");
    assert_eq!(value["valid"], true);
}

#[test]
fn parse_unknown_input_fails() {
    let output = run_glt(&["parse", "xyzzy", "plugh"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("No command matches"));
}

#[test]
fn parse_requires_text() {
    let output = run_glt(&["parse"]);
    assert!(!output.status.success());
}

#[test]
fn commands_lists_operations() {
    let output = run_glt(&["commands"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Available commands:"));
    assert!(stdout.contains("send-report"));
}

#[test]
fn commands_unknown_name_fails() {
    let output = run_glt(&["commands", "teleport"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown command"));
}

#[test]
fn extract_reads_stdin() {
    let output = run_glt_with_stdin(&["extract"], FEATURE_REQUEST);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("# Task Extraction Summary"));
    assert!(stdout.contains("login bug"));
}

#[test]
fn extract_reads_file_as_json() {
    let dir = std::env::temp_dir().join(format!("glt_cli_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("request.txt");
    std::fs::write(&path, FEATURE_REQUEST).unwrap();

    let output = run_glt(&["extract", "--format", "json", "--file", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = value.as_array().unwrap();
    assert!(tasks.len() >= 2);
    assert!(tasks.iter().all(|t| t["payload"]["weight"].is_u64()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn extract_missing_file_fails() {
    let output = run_glt(&["extract", "--file", "/nonexistent/glt/request.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn create_requires_project() {
    let output = run_glt(&["create"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--project"));
}
