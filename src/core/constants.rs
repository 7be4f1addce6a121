//! Constants used throughout cubby.
//!
//! Centralizes magic strings and default values.

/// Default descriptor store location, relative to the working directory.
pub const STORE_FILE: &str = ".devcontainer/secrets.json";

/// Directory under HOME holding generated caches (~/.cubby).
pub const CACHE_DIR: &str = ".cubby";

/// Extension of generated cache scripts.
pub const CACHE_EXT: &str = "sh";

/// Option key that enables publishing to GitHub Codespaces user secrets.
pub const REMOTE_OPTION: &str = "useGitHubUserSecrets";

/// Environment variable set to `true` inside GitHub Codespaces.
pub const REMOTE_ENV_FLAG: &str = "CODESPACES";

/// OAuth scope `gh` needs to manage Codespaces user secrets.
pub const GH_SECRETS_SCOPE: &str = "codespace:secrets";

/// Default timeout for a single remote call, in seconds.
pub const REMOTE_TIMEOUT_SECS: u64 = 30;

/// Header line of every generated cache script.
pub const CACHE_HEADER: &str =
    "# Generated by cubby. Do not edit; run `cubby reset` to re-resolve.";

/// Prefixes of the per-project markers delimiting the hook `cubby setup`
/// adds to shell rc files.
pub const HOOK_BEGIN: &str = "# >>> cubby";
pub const HOOK_END: &str = "# <<< cubby";

/// Shell rc files `cubby setup` registers the hook in (relative to HOME).
pub const SHELL_RC_FILES: &[&str] = &[".bashrc", ".zshrc"];
