//! Tests for `cubby status`.

use crate::support::*;
use serde_json::json;

#[test]
fn test_status_without_store() {
    let t = Test::new();

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets file");
    assert_stdout_contains(&output, "cubby setup");
}

#[test]
fn test_status_before_first_update() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "missing");
    assert_stdout_contains(&output, "never");
    assert_stdout_contains(&output, "✗ TOKEN");
    assert_stdout_contains(&output, "cubby update");
}

#[cfg(unix)]
#[test]
fn test_status_after_update() {
    let t = Test::with_store(
        true,
        json!([prompted("TOKEN", "token"), provided("KEY", "key", "key.sh")]),
    );
    t.install_fake_gh();
    assert_success(
        &t.cmd()
            .args(["--repository", "octo/widgets", "update"])
            .write_stdin("value\n")
            .output()
            .unwrap(),
    );

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "fresh");
    assert_stdout_contains(&output, "Codespaces user secrets");
    assert_stdout_contains(&output, "✓ TOKEN");
    assert_stdout_contains(&output, "✗ KEY");
    assert_stdout_contains(&output, "cubby reset");
}
