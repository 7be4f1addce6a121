//! Tests for `cubby option get|set`.

use crate::support::*;
use serde_json::json;

#[test]
fn test_option_get_default() {
    let t = Test::with_store(false, json!([]));

    let output = t.option_get("useGitHubUserSecrets");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn test_option_set_parses_json() {
    let t = Test::with_store(false, json!([]));

    assert_success(&t.option_set("useGitHubUserSecrets", "true"));
    assert_eq!(t.read_store()["options"]["useGitHubUserSecrets"], true);

    let output = t.option_get("useGitHubUserSecrets");
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_option_set_keeps_siblings() {
    let t = Test::new();
    t.write_store_raw(
        &json!({
            "options": { "bar": 1 },
            "secrets": [prompted("TOKEN", "token")],
            "extra": "kept",
        })
        .to_string(),
    );

    assert_success(&t.option_set("foo", "hello world"));

    let store = t.read_store();
    assert_eq!(store["options"]["foo"], "hello world");
    assert_eq!(store["options"]["bar"], 1);
    assert_eq!(store["extra"], "kept");
    assert_eq!(store["secrets"][0]["environmentVariable"], "TOKEN");
}

#[test]
fn test_option_nested_keys() {
    let t = Test::with_store(false, json!([]));

    assert_success(&t.option_set("login.azure.tenant", "contoso"));
    assert_eq!(t.read_store()["options"]["login"]["azure"]["tenant"], "contoso");

    let output = t.option_get("login.azure.tenant");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "contoso");

    let output = t.option_get("login.azure");
    assert_eq!(stdout(&output).trim(), r#"{"tenant":"contoso"}"#);
}

#[test]
fn test_option_get_unknown_key_fails() {
    let t = Test::with_store(false, json!([]));

    let output = t.option_get("doesNotExist");
    assert_failure(&output);
    assert_stderr_contains(&output, "option 'doesNotExist' is not set");
}

#[test]
fn test_option_set_creates_missing_store() {
    let t = Test::new();

    assert_success(&t.option_set("useGitHubUserSecrets", "true"));
    assert_eq!(t.read_store()["options"]["useGitHubUserSecrets"], true);
}

#[test]
fn test_option_get_ignores_malformed_secrets() {
    let t = Test::new();
    t.write_store_raw(r#"{ "options": { "useGitHubUserSecrets": true }, "secrets": "oops" }"#);

    let output = t.option_get("useGitHubUserSecrets");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_option_set_bumps_store_mtime() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));
    assert_success(&t.update_with("v\n"));

    std::thread::sleep(std::time::Duration::from_millis(1100));
    assert_success(&t.option_set("unrelated", "1"));

    let output = t.status();
    assert_stdout_contains(&output, "stale");
}

#[test]
fn test_option_invalid_key() {
    let t = Test::with_store(false, json!([]));

    assert_failure(&t.option_set("a..b", "1"));
    assert_failure(&t.option_get(""));
}
