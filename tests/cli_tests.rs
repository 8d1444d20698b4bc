//! Integration tests for the planscope CLI
//!
//! These tests verify CLI commands work correctly end-to-end against plan
//! files written into a temporary directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the planscope binary
fn planscope_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_planscope"))
}

/// Run planscope inside `dir` and return output
fn run_planscope(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(planscope_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("PLANSCOPE_CONFIG")
        .output()
        .expect("Failed to execute planscope")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const PLAN: &str = r#"{
  "format_version": "1.2",
  "terraform_version": "1.7.5",
  "resource_drift": [
    {
      "address": "aws_security_group.main",
      "type": "aws_security_group",
      "name": "main",
      "change": {"actions": ["update"], "before": {"name": "main-sg"}, "after": {"name": "edited-sg"}}
    }
  ],
  "resource_changes": [
    {
      "address": "aws_instance.web",
      "type": "aws_instance",
      "name": "web",
      "change": {
        "actions": ["create"],
        "before": null,
        "after": {"ami": "ami-12345678", "instance_type": "t3.micro"},
        "after_unknown": {"id": true},
        "before_sensitive": false,
        "after_sensitive": {}
      }
    },
    {
      "address": "aws_security_group.main",
      "type": "aws_security_group",
      "name": "main",
      "change": {
        "actions": ["delete", "create"],
        "before": {"name": "main-sg"},
        "after": {"name": "new-sg"},
        "replace_paths": [["name"]]
      }
    },
    {
      "address": "aws_db_instance.main",
      "type": "aws_db_instance",
      "name": "main",
      "change": {
        "actions": ["update"],
        "before": {"engine": "postgres", "password": "hunter2"},
        "after": {"engine": "postgres", "password": "correct-horse"},
        "before_sensitive": {"password": true},
        "after_sensitive": {"password": true}
      }
    },
    {
      "address": "module.net.aws_subnet.private[0]",
      "module_address": "module.net",
      "type": "aws_subnet",
      "name": "private",
      "index": 0,
      "change": {"actions": ["create"], "before": null, "after": {"cidr_block": "10.0.1.0/24"}}
    },
    {
      "address": "module.net.aws_subnet.private[1]",
      "module_address": "module.net",
      "type": "aws_subnet",
      "name": "private",
      "index": 1,
      "change": {"actions": ["create"], "before": null, "after": {"cidr_block": "10.0.2.0/24"}}
    }
  ]
}"#;

/// Write the sample plan into a fresh directory
fn plan_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("plan.json"), PLAN).unwrap();
    dir
}

#[test]
fn test_planscope_version() {
    let dir = TempDir::new().unwrap();
    let output = run_planscope(dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("planscope"));
}

#[test]
fn test_planscope_help() {
    let dir = TempDir::new().unwrap();
    let output = run_planscope(dir.path(), &["--help"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("summary"));
    assert!(stdout.contains("inspect"));
}

#[test]
fn test_summary() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["summary", "plan.json"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Plan Summary"));
    assert!(stdout.contains("1.7.5"));
    assert!(stdout.contains("to add"));
    assert!(stdout.contains("to replace"));
    assert!(stdout.contains("to change"));
    assert!(stdout.contains("module.net"));
    assert!(stdout.contains("changed outside of Terraform"));
}

#[test]
fn test_show_text() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["show", "plan.json"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("+ aws_instance.web (will be created)"));
    assert!(stdout.contains("+ id = (known after apply)"));
    assert!(stdout.contains("[module.net]"));
    assert!(stdout.contains("# forces replacement"));
    assert!(stdout.contains("(sensitive)"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_show_sensitive_flag() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["show", "plan.json", "--show-sensitive"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("correct-horse"));
}

#[test]
fn test_show_with_drift() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["show", "plan.json", "--drift"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("(observed: \"edited-sg\")"));
    assert!(stdout.contains("# drifted"));
}

#[test]
fn test_show_html_to_file() {
    let dir = plan_dir();
    let output = run_planscope(
        dir.path(),
        &["show", "plan.json", "--format", "html", "--output", "plan.html"],
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Wrote plan diff"));

    let html = std::fs::read_to_string(dir.path().join("plan.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("aws_instance.web"));
}

#[test]
fn test_config_file_applies() {
    let dir = plan_dir();
    std::fs::write(dir.path().join(".planscope.yaml"), "show_sensitive: true\n").unwrap();

    let output = run_planscope(dir.path(), &["show", "plan.json"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("correct-horse"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = plan_dir();
    std::fs::write(dir.path().join("bad.yaml"), "show_sensitive: [oops").unwrap();

    let output = run_planscope(dir.path(), &["--config", "bad.yaml", "summary", "plan.json"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to load configuration"));
}

#[test]
fn test_groups_by_type() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["groups", "plan.json", "--by", "type"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("aws_subnet (2)"));
    assert!(stdout.contains("module.net.aws_subnet.private [count] (2)"));
    assert!(stdout.contains("aws_instance.web"));
}

#[test]
fn test_groups_by_module() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["groups", "plan.json"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let root = stdout.find("root (3)").unwrap();
    let net = stdout.find("module.net (2)").unwrap();
    assert!(root < net);
}

#[test]
fn test_groups_by_construct_requires_metadata() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["groups", "plan.json", "--by", "construct"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("--metadata"));
}

#[test]
fn test_groups_by_construct() {
    let dir = plan_dir();
    std::fs::write(
        dir.path().join("metadata.json"),
        r#"{
  "aws_instance": {"web": {"//": {"metadata": {"path": "stack/app/web"}}}},
  "aws_db_instance": {"main": {"//": {"metadata": {"path": "stack/data/main"}}}}
}"#,
    )
    .unwrap();

    let output = run_planscope(
        dir.path(),
        &["groups", "plan.json", "--by", "construct", "--metadata", "metadata.json"],
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Resources by construct"));
    assert!(stdout.contains("app (1)"));
    assert!(stdout.contains("web (1)"));
    assert!(stdout.contains("data (1)"));
    assert!(stdout.contains("main (1)"));
}

#[test]
fn test_diff_resource() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["diff", "plan.json", "aws_security_group.main"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("must be replaced"));
    assert!(stdout.contains("name: \"main-sg\" -> \"new-sg\" # forces replacement"));
}

#[test]
fn test_diff_with_drift() {
    let dir = plan_dir();
    let output = run_planscope(
        dir.path(),
        &["diff", "plan.json", "aws_security_group.main", "--drift"],
    );

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("(observed: \"edited-sg\")"));
    assert!(stdout.contains("# drifted"));
}

#[test]
fn test_diff_hides_sensitive_values() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["diff", "plan.json", "aws_db_instance.main"]);

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("password: (sensitive) -> (sensitive)"));
    assert!(!stdout.contains("engine"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_diff_all_includes_unchanged() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["diff", "plan.json", "aws_db_instance.main", "--all"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("engine: \"postgres\""));
}

const SETTINGS_PLAN: &str = r#"{
  "resource_changes": [
    {
      "address": "aws_db_instance.main",
      "type": "aws_db_instance",
      "name": "main",
      "change": {
        "actions": ["update"],
        "before": {"settings": {"password": "hunter2", "port": 1}},
        "after": {"settings": {"password": "hunter2", "port": 2}},
        "before_sensitive": {"settings": {"password": true}},
        "after_sensitive": {"settings": {"password": true}}
      }
    }
  ]
}"#;

fn settings_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("plan.json"), SETTINGS_PLAN).unwrap();
    dir
}

#[test]
fn test_diff_all_masks_object_with_sensitive_member() {
    let dir = settings_dir();
    let output = run_planscope(dir.path(), &["diff", "plan.json", "aws_db_instance.main", "--all"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("settings: (sensitive) -> (sensitive)"));
    assert!(stdout.contains("settings.port: 1 -> 2"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_inspect_masks_object_with_sensitive_member() {
    let dir = settings_dir();
    let output = run_planscope(
        dir.path(),
        &["inspect", "plan.json", "aws_db_instance.main", "settings"],
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("(sensitive)"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_inspect_shows_plain_member_of_sensitive_object() {
    let dir = settings_dir();
    let output = run_planscope(
        dir.path(),
        &["inspect", "plan.json", "aws_db_instance.main", "settings.port"],
    );

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("After:"));
    assert!(!stdout.contains("(sensitive)"));
}

#[test]
fn test_show_unchanged_reveals_unchanged_attributes() {
    let dir = plan_dir();

    let output = run_planscope(dir.path(), &["show", "plan.json"]);
    assert!(output.status.success());
    assert!(!stdout_of(&output).contains("engine"));

    let output = run_planscope(dir.path(), &["show", "plan.json", "--show-unchanged"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("engine = \"postgres\""));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_show_unchanged_masks_object_with_sensitive_member() {
    let dir = settings_dir();
    let output = run_planscope(dir.path(), &["show", "plan.json", "--show-unchanged"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("settings.password = (sensitive)"));
    assert!(stdout.contains("~ settings.port = 1 -> 2"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_diff_missing_address_fails() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["diff", "plan.json", "aws_instance.nope"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("not found"));
}

#[test]
fn test_inspect_property() {
    let dir = plan_dir();
    let output = run_planscope(
        dir.path(),
        &["inspect", "plan.json", "aws_db_instance.main", "password"],
    );

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Sensitive after:"));
    assert!(stdout.contains("yes"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_inspect_missing_address_fails() {
    let dir = plan_dir();
    let output = run_planscope(dir.path(), &["inspect", "plan.json", "aws_vpc.none", "cidr_block"]);

    assert!(!output.status.success());
}

#[test]
fn test_malformed_plan_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("plan.json"), "[1, 2, 3]").unwrap();

    let output = run_planscope(dir.path(), &["summary", "plan.json"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to load plan"));
}

#[test]
fn test_missing_plan_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_planscope(dir.path(), &["summary", "absent.json"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to read plan file"));
}
