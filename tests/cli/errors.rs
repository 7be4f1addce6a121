//! Error handling tests: exit codes, messages and hints.

use crate::support::*;
use serde_json::json;

#[test]
fn test_update_without_store() {
    let t = Test::new();

    let output = t.update();
    assert_failure(&output);
    assert_stderr_contains(&output, "secrets file not found");
    assert_stdout_contains(&output, "cubby setup");
}

#[test]
fn test_malformed_store() {
    let t = Test::new();
    t.write_store_raw("{ not json");

    let output = t.update();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse");
    assert!(!t.cache_path().exists());
}

#[test]
fn test_invalid_secret_name() {
    let t = Test::with_store(false, json!([prompted("1BAD-NAME", "bad")]));

    let output = t.update();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid secret name '1BAD-NAME'");
}

#[test]
fn test_duplicate_secret() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "a"), prompted("TOKEN", "b")]));

    let output = t.update();
    assert_failure(&output);
    assert_stderr_contains(&output, "secret 'TOKEN' is declared more than once");
}

#[test]
fn test_unknown_command() {
    let t = Test::new();

    let output = t.cmd().arg("frobnicate").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    for command in ["update", "reset", "setup", "status", "option", "completions"] {
        assert_stdout_contains(&output, command);
    }
}

#[test]
fn test_completions() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cubby");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::with_store(false, json!([]));

    let output = t.cmd().args(["--verbose", "update"]).output().unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "freshness check");
}

#[test]
fn test_version() {
    use predicates::prelude::*;

    let t = Test::new();
    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cubby "));
}

#[test]
fn test_option_without_subcommand_fails() {
    use predicates::prelude::*;

    let t = Test::new();
    t.cmd()
        .arg("option")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
