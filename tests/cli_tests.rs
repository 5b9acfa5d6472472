//! Integration tests for the tfplan CLI
//!
//! These tests verify CLI commands work correctly end-to-end.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Get the path to the tfplan binary
fn tfplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tfplan"))
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Run tfplan command and return output
fn run_tfplan(args: &[&str]) -> std::process::Output {
    Command::new(tfplan_binary())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tfplan")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

#[test]
fn test_tfplan_version() {
    let output = run_tfplan(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tfplan"));
}

#[test]
fn test_tfplan_help() {
    let output = run_tfplan(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("resources"));
    assert!(stdout.contains("summary"));
}

#[test]
fn test_tfplan_after_help_lists_filters() {
    let output = run_tfplan(&["after", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--ignore-sensitive"));
    assert!(stdout.contains("--ignore-computed"));
    assert!(stdout.contains("--ignore-no-op"));
    assert!(stdout.contains("--computed-only"));
}

#[test]
fn test_tfplan_resources() {
    let output = run_tfplan(&["resources", &fixture("nestedmap.stdout")]);

    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(
        json[0]["address"],
        "module.mymodule.kubernetes_namespace.mynamespace"
    );
    assert_eq!(json[0]["module_address"], "module.mymodule");
}

#[test]
fn test_tfplan_resources_pretty() {
    let output = run_tfplan(&["resources", "--pretty", &fixture("array.stdout")]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\n  {"));
    assert!(stdout.contains("\"update_type\": \"destroy\""));
}

#[test]
fn test_tfplan_after_with_filters() {
    let output = run_tfplan(&[
        "after",
        &fixture("replace.stdout"),
        "--ignore-sensitive",
        "--ignore-no-op",
    ]);

    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["aws_db_instance.main"],
        serde_json::json!({"allocated_storage": 50, "port": 5433})
    );
}

#[test]
fn test_tfplan_before() {
    let output = run_tfplan(&["before", &fixture("colored.stdout")]);

    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["aws_s3_bucket.logs"]["bucket"], "my-logs");
}

#[test]
fn test_tfplan_computed_only_conflicts_with_ignore_computed() {
    let output = run_tfplan(&[
        "after",
        &fixture("create.stdout"),
        "--computed-only",
        "--ignore-computed",
    ]);

    assert!(!output.status.success());
}

#[test]
fn test_tfplan_reads_stdin() {
    let plan = std::fs::read(fixture("data_source.stdout")).unwrap();

    let mut child = Command::new(tfplan_binary())
        .args(["resources", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute tfplan");
    child.stdin.take().unwrap().write_all(&plan).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json[0]["update_type"], "read");
    assert_eq!(json[1]["index"], "eu-west-1a");
}

#[test]
fn test_tfplan_summary() {
    let output = run_tfplan(&["summary", &fixture("replace.stdout")]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Plan Summary"));
    assert!(stdout.contains("aws_instance.app"));
    assert!(stdout.contains("must be replaced"));
    assert!(stdout.contains("to replace"));
}

#[test]
fn test_tfplan_summary_no_changes() {
    let output = run_tfplan(&["summary", &fixture("nochanges.stdout")]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No changes."));
}

#[test]
fn test_tfplan_missing_file_fails() {
    let output = run_tfplan(&["resources", "/nonexistent/plan.stdout"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open file"));
}

#[test]
fn test_tfplan_truncated_plan_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.stdout");
    std::fs::write(
        &path,
        "Terraform will perform the following actions:\n  # aws_instance.web will be created\n",
    )
    .unwrap();

    let output = run_tfplan(&["resources", path.to_str().unwrap()]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unexpected end of input"));
}
