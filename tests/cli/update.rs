//! Tests for `cubby update`.

use crate::skip_without_bash;
use crate::support::*;
use serde_json::json;

#[test]
fn test_update_caches_prompted_values() {
    let t = Test::with_store(
        false,
        json!([
            prompted("DB_PASSWORD", "Password for the dev database"),
            prompted("API_TOKEN", "Token for the staging API"),
        ]),
    );

    let output = t.update_with("hunter2\nit's a token\n");
    assert_success(&output);
    assert_stdout_contains(&output, "cached 2 secrets");

    let cache = t.read_cache();
    assert_cached(&cache, "DB_PASSWORD", "hunter2");
    assert_cached(&cache, "API_TOKEN", "it's a token");
    assert!(cache.contains("# Password for the dev database\n"));
    assert!(cache.contains("if [ \"${CODESPACES:-}\" != \"true\" ]; then\n"));
}

#[test]
fn test_second_update_is_a_no_op() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));

    assert_success(&t.update_with("first\n"));
    let written = t.cache_mtime();

    let output = t.update_with("second\n");
    assert_success(&output);
    assert_stdout_contains(&output, "up to date");
    assert_eq!(t.cache_mtime(), written);
    assert_cached(&t.read_cache(), "TOKEN", "first");
}

#[test]
fn test_quiet_update_prints_nothing_when_fresh() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));
    assert_success(&t.update_with("v\n"));

    let output = t.cmd().args(["update", "--quiet"]).output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_store_change_only_resolves_new_secrets() {
    let t = Test::with_store(false, json!([prompted("OLD", "old")]));
    assert_success(&t.update_with("kept\n"));

    t.write_store(false, json!([prompted("OLD", "old"), prompted("NEW", "new")]));
    t.touch_store();

    let output = t.update_with("added\n");
    assert_success(&output);

    let cache = t.read_cache();
    assert_cached(&cache, "OLD", "kept");
    assert_cached(&cache, "NEW", "added");
}

#[test]
fn test_removed_secret_drops_out_of_cache() {
    let t = Test::with_store(false, json!([prompted("A", "a"), prompted("B", "b")]));
    assert_success(&t.update_with("1\n2\n"));

    t.write_store(false, json!([prompted("B", "b")]));
    t.touch_store();
    assert_success(&t.update());

    let cache = t.read_cache();
    assert_not_cached(&cache, "A");
    assert_cached(&cache, "B", "2");
}

#[test]
fn test_provider_values_are_cached() {
    skip_without_bash!();
    let t = Test::with_store(
        false,
        json!([provided("REGISTRY_TOKEN", "registry", "scripts/token.sh")]),
    );
    t.write_provider("scripts/token.sh", &exporting("REGISTRY_TOKEN", "from-provider"));

    let output = t.update();
    assert_success(&output);
    assert_cached(&t.read_cache(), "REGISTRY_TOKEN", "from-provider");
}

#[test]
fn test_provider_output_does_not_leak_into_value() {
    skip_without_bash!();
    let t = Test::with_store(false, json!([provided("TOKEN", "t", "token.sh")]));
    t.write_provider(
        "token.sh",
        "echo 'logging in...'\nTOKEN=abc123\necho 'done'\n",
    );

    assert_success(&t.update());
    assert_cached(&t.read_cache(), "TOKEN", "abc123");
}

#[test]
fn test_partial_failure_keeps_other_secrets() {
    skip_without_bash!();
    let t = Test::with_store(
        false,
        json!([
            provided("FIRST", "1", "first.sh"),
            provided("SECOND", "2", "missing.sh"),
            provided("THIRD", "3", "third.sh"),
        ]),
    );
    t.write_provider("first.sh", &exporting("FIRST", "one"));
    t.write_provider("third.sh", &exporting("THIRD", "three"));

    let output = t.update();
    assert_success(&output);
    assert_stdout_contains(&output, "provider for SECOND not found");
    assert_stdout_contains(&output, "cubby reset");

    let cache = t.read_cache();
    assert_cached(&cache, "FIRST", "one");
    assert_not_cached(&cache, "SECOND");
    assert_cached(&cache, "THIRD", "three");
}

#[test]
fn test_failing_provider_is_reported() {
    skip_without_bash!();
    let t = Test::with_store(false, json!([provided("TOKEN", "t", "token.sh")]));
    t.write_provider("token.sh", "echo 'not logged in' >&2\nreturn 3\n");

    let output = t.update();
    assert_success(&output);
    assert_stdout_contains(&output, "provider for TOKEN failed");
    assert_not_cached(&t.read_cache(), "TOKEN");
}

#[test]
fn test_provider_with_failing_last_command_is_cached() {
    skip_without_bash!();
    let t = Test::with_store(false, json!([provided("TOKEN", "t", "token.sh")]));
    t.write_provider(
        "token.sh",
        "export TOKEN=abc\n[ -n \"$CUBBY_DEBUG_PROVIDER\" ] && echo debug\n",
    );

    let output = t.cmd().env_remove("CUBBY_DEBUG_PROVIDER").arg("update").output().unwrap();
    assert_success(&output);
    assert_cached(&t.read_cache(), "TOKEN", "abc");
}

#[test]
fn test_empty_value_is_accepted_with_warning() {
    let t = Test::with_store(false, json!([prompted("OPTIONAL", "optional")]));

    let output = t.update_with("\n");
    assert_success(&output);
    assert_stdout_contains(&output, "1 secret resolved to an empty value");
    assert_cached(&t.read_cache(), "OPTIONAL", "");
}

#[test]
fn test_empty_store_writes_guarded_cache() {
    let t = Test::with_store(false, json!([]));

    assert_success(&t.update());
    let cache = t.read_cache();
    assert!(cache.starts_with("# Generated by cubby"));
    assert!(cache.trim_end().ends_with("fi"));
}

#[test]
fn test_codespaces_skips_update() {
    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));

    let output = t
        .cmd()
        .arg("update")
        .env("CODESPACES", "true")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "Codespaces");
    assert!(!t.cache_path().exists());
}

#[test]
fn test_custom_paths() {
    let t = Test::new();
    let store = t.dir.path().join("conf/secrets.json");
    std::fs::create_dir_all(store.parent().unwrap()).unwrap();
    std::fs::write(
        &store,
        json!({ "secrets": [prompted("TOKEN", "token")] }).to_string(),
    )
    .unwrap();
    let cache = t.dir.path().join("out/cache.sh");

    let output = t
        .cmd()
        .args(["--store", "conf/secrets.json", "--cache"])
        .arg(&cache)
        .arg("update")
        .write_stdin("value\n")
        .output()
        .unwrap();
    assert_success(&output);

    let contents = std::fs::read_to_string(&cache).unwrap();
    assert_cached(&contents, "TOKEN", "value");
    assert!(!t.cache_path().exists());
}

#[cfg(unix)]
#[test]
fn test_cache_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_store(false, json!([prompted("TOKEN", "token")]));
    assert_success(&t.update_with("v\n"));

    let mode = std::fs::metadata(t.cache_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

/// Write a secrets file declaring `TOKEN` under `project`.
fn nested_project(project: &std::path::Path) {
    let store = project.join(".devcontainer/secrets.json");
    std::fs::create_dir_all(store.parent().unwrap()).unwrap();
    let doc = json!({
        "options": { "useGitHubUserSecrets": false },
        "secrets": [prompted("TOKEN", "token")],
    });
    std::fs::write(store, doc.to_string()).unwrap();
}

#[test]
fn test_same_named_projects_keep_separate_caches() {
    let t = Test::new();
    let work = t.dir.path().join("work/api");
    let personal = t.dir.path().join("personal/api");
    nested_project(&work);
    nested_project(&personal);

    let output = t
        .cmd()
        .current_dir(&work)
        .arg("update")
        .write_stdin("secret-for-work\n")
        .output()
        .unwrap();
    assert_success(&output);

    let output = t
        .cmd()
        .current_dir(&personal)
        .arg("update")
        .write_stdin("secret-for-personal\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cached 1 secret");

    let cache_for = |dir: &std::path::Path| {
        let project = cubby::core::config::project_id(dir);
        let path = t.home.path().join(".cubby").join(format!("{}.sh", project));
        std::fs::read_to_string(path).expect("cache exists")
    };
    assert_cached(&cache_for(&work), "TOKEN", "secret-for-work");
    assert_cached(&cache_for(&personal), "TOKEN", "secret-for-personal");
}
