//! Value providers.
//!
//! A provider supplies a secret's value without prompting. Providers declared
//! in the store are shell scripts written to *set* the variable (for example
//! by logging in to a cloud CLI and exporting a token). [`ScriptProvider`]
//! runs such a script in a child `bash` and hands the value back as a
//! [`ProviderResult`], so the calling process environment is never mutated.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::domain::{ProviderResult, SecretDescriptor};
use crate::error::ResolveError;

/// Resolve a descriptor's value programmatically.
pub trait ValueProvider {
    /// Produce the value for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::ProviderMissing` if the provider does not exist
    /// and `ResolveError::ProviderFailed` if it ran but produced no value.
    fn resolve(&self, descriptor: &SecretDescriptor) -> Result<ProviderResult, ResolveError>;
}

/// Marker printed before the value so an early `exit 0` in a provider is
/// distinguishable from an empty value.
const VALUE_MARKER: &str = "cubby-value:";

/// Exit code used when the script ran but left the variable unset.
const UNSET_EXIT: i32 = 97;

/// Sources the script with stdout sent to stderr, then prints the variable.
/// `$1` is the script path and `$2` the variable name.
///
/// The status of the script's last command is ignored; only an explicit
/// `exit` or an unset variable counts as failure.
const RUNNER: &str = r#"set -a
. "$1" >&2
if [ -z "${!2+x}" ]; then exit 97; fi
printf 'cubby-value:%s' "${!2}"
"#;

/// Runs provider scripts with `bash`.
#[derive(Debug, Clone)]
pub struct ScriptProvider {
    workdir: PathBuf,
}

impl ScriptProvider {
    /// Providers run in, and relative provider paths resolve against, `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl ValueProvider for ScriptProvider {
    fn resolve(&self, descriptor: &SecretDescriptor) -> Result<ProviderResult, ResolveError> {
        let name = descriptor.name.clone();
        let failed = |reason: String| ResolveError::ProviderFailed {
            name: name.clone(),
            reason,
        };

        let script = descriptor
            .provider_path(&self.workdir)
            .ok_or_else(|| failed("no provider declared".to_string()))?;

        if !script.is_file() {
            return Err(ResolveError::ProviderMissing {
                name: name.clone(),
                path: script,
            });
        }

        let bash = which::which("bash").map_err(|e| failed(format!("bash not found: {}", e)))?;
        debug!(name = %name, script = %script.display(), "running provider");

        // stdin and stderr stay attached to the terminal so providers that
        // run a login flow can still interact with the user.
        let output = Command::new(bash)
            .arg("-c")
            .arg(RUNNER)
            .arg("cubby-provider")
            .arg(&script)
            .arg(&name)
            .current_dir(&self.workdir)
            .env_remove(&name)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| failed(format!("failed to spawn bash: {}", e)))?;

        match output.status.code() {
            Some(0) => {}
            Some(UNSET_EXIT) => {
                return Err(failed(format!("{} did not set {}", script.display(), name)))
            }
            Some(code) => return Err(failed(format!("exited with status {}", code))),
            None => return Err(failed("terminated by signal".to_string())),
        }

        let stdout = Zeroizing::new(
            String::from_utf8(output.stdout)
                .map_err(|_| failed("value is not valid UTF-8".to_string()))?,
        );
        let value = stdout
            .strip_prefix(VALUE_MARKER)
            .ok_or_else(|| failed("provider exited before setting the variable".to_string()))?;

        trace!(name = %name, len = value.len(), "provider returned value");
        Ok(ProviderResult {
            name,
            value: Zeroizing::new(value.to_string()),
        })
    }
}
