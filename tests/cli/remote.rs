//! Tests for publishing to Codespaces user secrets through a fake `gh`.

#![cfg(unix)]

use crate::support::*;
use serde_json::json;

fn remote_test(secrets: serde_json::Value) -> Test {
    let t = Test::with_store(true, secrets);
    t.install_fake_gh();
    t.install_fake_git("git@github.com:octo/widgets.git");
    t
}

#[test]
fn test_publishes_new_secret_to_current_repository() {
    let t = remote_test(json!([prompted("TOKEN", "token")]));

    let output = t.update_with("s3cr3t\n");
    assert_success(&output);
    assert_stdout_contains(&output, "published 1 secret to Codespaces for octo/widgets");

    assert_eq!(t.remote_repos("TOKEN").as_deref(), Some("octo/widgets"));
    assert_eq!(t.remote_value("TOKEN").as_deref(), Some("s3cr3t"));
}

#[test]
fn test_existing_scope_is_extended() {
    let t = remote_test(json!([prompted("TOKEN", "token")]));
    t.seed_remote("TOKEN", &["octo/gadgets"]);

    assert_success(&t.update_with("v\n"));

    assert_eq!(
        t.remote_repos("TOKEN").as_deref(),
        Some("octo/gadgets,octo/widgets")
    );
}

#[test]
fn test_unchanged_scope_is_still_republished() {
    let t = remote_test(json!([prompted("TOKEN", "token")]));
    t.seed_remote("TOKEN", &["octo/widgets"]);

    assert_success(&t.update_with("rotated\n"));

    assert_eq!(t.remote_repos("TOKEN").as_deref(), Some("octo/widgets"));
    assert_eq!(t.remote_value("TOKEN").as_deref(), Some("rotated"));
}

#[test]
fn test_value_never_on_command_line() {
    let t = remote_test(json!([prompted("TOKEN", "token")]));

    assert_success(&t.update_with("very-secret-value\n"));

    let calls = t.gh_calls();
    assert!(calls
        .iter()
        .any(|c| c == "secret set TOKEN --user --repos octo/widgets"));
    assert!(calls.iter().all(|c| !c.contains("very-secret-value")));
}

#[test]
fn test_scope_fetch_failure_skips_only_that_secret() {
    let t = remote_test(json!([
        prompted("FIRST", "first"),
        prompted("BROKEN", "broken"),
        prompted("LAST", "last"),
    ]));
    t.fail_remote("BROKEN");

    let output = t.update_with("1\n2\n3\n");
    assert_success(&output);
    assert_stdout_contains(&output, "failed to fetch repositories for BROKEN");
    assert_stdout_contains(&output, "published 2 secrets");

    assert!(t.remote_value("FIRST").is_some());
    assert!(t.remote_value("BROKEN").is_none());
    assert!(t.remote_value("LAST").is_some());
    assert_cached(&t.read_cache(), "BROKEN", "2");
}

#[test]
fn test_repository_override() {
    let t = Test::with_store(true, json!([prompted("TOKEN", "token")]));
    t.install_fake_gh();

    let output = t
        .cmd()
        .args(["--repository", "octo/override", "update"])
        .write_stdin("v\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.remote_repos("TOKEN").as_deref(), Some("octo/override"));
}

#[test]
fn test_unknown_repository_is_fatal_but_keeps_cache() {
    let t = Test::with_store(true, json!([prompted("TOKEN", "token")]));
    t.install_fake_gh();
    t.write_bin("git", "#!/bin/sh\nexit 1\n");

    let output = t.update_with("v\n");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot determine current repository");
    assert_stdout_contains(&output, "CUBBY_REPOSITORY");

    assert_cached(&t.read_cache(), "TOKEN", "v");
    assert!(t.gh_calls().is_empty());
}

#[test]
fn test_sync_disabled_never_calls_gh() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));
    t.install_fake_gh();

    assert_success(&t.update_with("v\n"));
    assert!(t.gh_calls().is_empty());
}

#[test]
fn test_fresh_cache_skips_sync() {
    let t = remote_test(json!([prompted("TOKEN", "token")]));
    assert_success(&t.update_with("v\n"));
    let calls = t.gh_calls().len();

    assert_success(&t.update());
    assert_eq!(t.gh_calls().len(), calls);
}

#[test]
fn test_timeout_is_reported_per_secret() {
    let t = Test::with_store(true, json!([prompted("TOKEN", "token")]));
    t.install_fake_git("https://github.com/octo/widgets.git");
    t.write_bin(
        "gh",
        "#!/bin/sh\ncase \"$1 $2\" in\n  \"auth status\") exit 0 ;;\nesac\nsleep 5\n",
    );

    let output = t
        .cmd()
        .args(["--timeout", "1", "update"])
        .write_stdin("v\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "timed out after 1s");
    assert_stdout_contains(&output, "published 0 secrets");
}
