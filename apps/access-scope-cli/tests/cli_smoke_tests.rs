#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the access-scope binary
//!
//! These tests run the built binary against a small dataset and check
//! notices, JSON output and exit codes.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const DATASET: &str = r"
profiles:
  - id: Finance-ReadOnly
    entries:
      - { scope_type: CostCenter, scope_name: CC-100, read: true, write: false }
  - id: Empty
users:
  - id: alice
  - id: bob
    scope:
      - { scope_type: Company, scope_name: ACME, read: true, write: true }
org_units:
  - { id: ENT-1, kind: Enterprise, company: ACME }
  - { id: ENT-2, kind: Enterprise, company: GLOBEX }
  - { id: SBU-1, kind: StrategicBusinessUnit, company: ACME, enterprise: ENT-1, cost_center: CC-SBU1 }
resources:
  - { kind: CostCenter, id: CC-100, company: ACME }
";

/// Helper to run the access-scope binary with given arguments
fn run_access_scope(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_access-scope"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute access-scope")
}

fn write_dataset(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("dataset.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help_lists_commands() {
    let output = run_access_scope(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let out = stdout(&output);
    assert!(out.contains("Usage:"));
    for cmd in ["resolve", "apply", "clear", "candidates", "record-filter", "check"] {
        assert!(out.contains(cmd), "help should mention '{cmd}'");
    }
}

#[test]
fn test_print_config_honours_env_override() {
    let output = Command::new(env!("CARGO_BIN_EXE_access-scope"))
        .arg("--print-config")
        .env("APP__ACCESS_SCOPE__MAX_HIERARCHY_DEPTH", "8")
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["access_scope"]["max_hierarchy_depth"], 8);
    assert_eq!(config["access_scope"]["privileged_roles"][0], "System Manager");
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_access_scope(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_resolve_prints_entries() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);

    let output = run_access_scope(&["--data", path_str(&data), "resolve", "Finance-ReadOnly"]);
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["scope_type"], "Cost Center");
    assert_eq!(entries[0]["scope_name"], "CC-100");
    assert_eq!(entries[0]["can_write"], false);
}

#[test]
fn test_resolve_unknown_profile_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);

    let output = run_access_scope(&["--data", path_str(&data), "resolve", "Ghost"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not Found"), "stderr: {stderr}");
    assert!(stderr.contains("Ghost"));
}

#[test]
fn test_apply_and_save_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);
    let saved = dir.path().join("saved.json");

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "apply",
        "alice",
        "Finance-ReadOnly",
        "--save",
        path_str(&saved),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("1 access scope entries copied"));

    let output = run_access_scope(&["--data", path_str(&saved), "show", "alice"]);
    assert!(output.status.success());
    let scope: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(scope["profile_id"], "Finance-ReadOnly");
    assert_eq!(scope["entries"].as_array().unwrap().len(), 1);
}

#[test]
fn test_apply_empty_profile_warns() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);

    let output = run_access_scope(&["--data", path_str(&data), "apply", "bob", "Empty"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No access scope data found for the selected profile."));
}

#[test]
fn test_candidates_descriptor_and_listing() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "candidates",
        "FactoryBusinessUnit.enterprise",
        "--set",
        "company=ACME",
    ]);
    assert!(output.status.success());
    let filter: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(filter["target"], "enterprise");
    assert_eq!(filter["constraint"]["op"], "all_of");

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "candidates",
        "FactoryBusinessUnit.enterprise",
        "--set",
        "company=ACME",
        "--list",
    ]);
    assert!(output.status.success());
    let found: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], "ENT-1");

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "candidates",
        "FactoryBusinessUnit.enterprise",
    ]);
    let filter: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(filter["constraint"]["op"], "deny_all");
}

#[test]
fn test_record_filter_for_privileged_and_plain_users() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "record-filter",
        "bob",
        "--doc",
        "Purchase Order",
        "--role",
        "System Manager",
    ]);
    assert!(output.status.success());
    let filter: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(filter["filter"], "unrestricted");

    let output = run_access_scope(&[
        "--data",
        path_str(&data),
        "record-filter",
        "bob",
        "--doc",
        "sales-invoice",
    ]);
    let filter: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(filter["filter"], "deny_all");
}

#[test]
fn test_check_reports_hierarchy_violations() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, DATASET);
    let output = run_access_scope(&["--data", path_str(&data), "check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("valid"));

    let broken = DATASET.replace(
        "resources:",
        "  - { id: SBU-2, kind: StrategicBusinessUnit, company: GLOBEX, enterprise: ENT-1 }\nresources:",
    );
    let data = write_dataset(&dir, &broken);
    let output = run_access_scope(&["--data", path_str(&data), "check"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("SBU-2"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(&dir, &DATASET.replace("  - id: bob", "  - id: alice"));
    let output = run_access_scope(&["--data", path_str(&data), "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate user id 'alice'"));
}
