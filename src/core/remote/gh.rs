//! GitHub Codespaces user secrets through the `gh` CLI.
//!
//! ## Requirements
//!
//! - `gh` must be installed; authentication is established on first use
//! - the token needs the `codespace:secrets` scope
//!
//! Values are passed to `gh secret set` on stdin, never on the command line.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::core::domain::{RemoteScope, ScopeLookup};
use crate::core::remote::{exec, RemoteStore};
use crate::error::RemoteError;

/// Remote store backed by the `gh` CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: PathBuf,
    timeout: Duration,
}

impl GhCli {
    /// Locate `gh` on PATH.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::GhNotFound` if it is not installed.
    pub fn locate(timeout: Duration) -> Result<Self, RemoteError> {
        let program = which::which("gh").map_err(|_| RemoteError::GhNotFound)?;
        Ok(Self::with_program(program, timeout))
    }

    /// Use a specific `gh` binary.
    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Run a non-interactive `gh` call under the timeout.
    ///
    /// I/O failures other than a missing binary go through `on_error`, so
    /// each operation reports them as its own kind of error.
    fn call(
        &self,
        operation: &str,
        args: &[&str],
        stdin: Option<&[u8]>,
        on_error: impl FnOnce(String) -> RemoteError,
    ) -> Result<Output, RemoteError> {
        let output = exec::run(&self.program, args, stdin, self.timeout).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RemoteError::GhNotFound
            } else {
                on_error(format!("failed to run gh: {}", e))
            }
        })?;

        output.ok_or_else(|| RemoteError::Timeout {
            operation: operation.to_string(),
            seconds: self.timeout.as_secs(),
        })
    }

    /// Run an interactive `gh` call attached to the terminal.
    ///
    /// Login flows wait on the user, so no timeout applies.
    fn interactive(&self, args: &[&str]) -> Result<(), RemoteError> {
        info!(?args, "running interactive gh command");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| RemoteError::Auth(format!("failed to run gh: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(RemoteError::Auth(format!(
                "`gh {}` exited with {}",
                args.join(" "),
                status
            )))
        }
    }
}

impl RemoteStore for GhCli {
    fn ensure_session(&self, scope: &str) -> Result<(), RemoteError> {
        let status = self.call("gh auth status", &["auth", "status"], None, RemoteError::Auth)?;

        if !status.status.success() {
            debug!("not logged in to GitHub");
            return self.interactive(&["auth", "login", "--web", "--scopes", scope]);
        }

        let report = format!(
            "{}{}",
            String::from_utf8_lossy(&status.stdout),
            String::from_utf8_lossy(&status.stderr)
        );
        if missing_scope(&report, scope) {
            debug!(scope, "token lacks scope, refreshing");
            return self.interactive(&["auth", "refresh", "--scopes", scope]);
        }

        trace!("gh session ok");
        Ok(())
    }

    fn fetch_scope(&self, name: &str) -> Result<ScopeLookup, RemoteError> {
        let endpoint = format!("/user/codespaces/secrets/{}/repositories", name);
        let output = self.call(
            &format!("fetching repositories for {}", name),
            &[
                "api",
                "--paginate",
                "-H",
                "Accept: application/vnd.github+json",
                &endpoint,
                "--jq",
                ".repositories[].full_name",
            ],
            None,
            |reason| RemoteError::ScopeFetch {
                name: name.to_string(),
                reason,
            },
        )?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if is_not_found(&stderr) {
                debug!(name, "secret not published yet");
                return Ok(ScopeLookup::NotFound);
            }
            return Err(RemoteError::ScopeFetch {
                name: name.to_string(),
                reason: first_line(&stderr),
            });
        }

        let scope: RemoteScope = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        debug!(name, repositories = scope.len(), "fetched scope");
        Ok(ScopeLookup::Found(scope))
    }

    fn publish(&self, name: &str, value: &str, scope: &RemoteScope) -> Result<(), RemoteError> {
        let repos = scope.to_string();
        let output = self.call(
            &format!("publishing {}", name),
            &["secret", "set", name, "--user", "--repos", &repos],
            Some(value.as_bytes()),
            |reason| RemoteError::Publish {
                name: name.to_string(),
                reason,
            },
        )?;

        if !output.status.success() {
            return Err(RemoteError::Publish {
                name: name.to_string(),
                reason: first_line(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        debug!(name, repos = %repos, "published");
        Ok(())
    }
}

/// `gh api` reports HTTP errors on stderr as `gh: Not Found (HTTP 404)`.
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("HTTP 404")
}

/// Whether `gh auth status` lists token scopes and `scope` is not among them.
///
/// Tokens from `GH_TOKEN` report no scopes; those are trusted as-is.
fn missing_scope(report: &str, scope: &str) -> bool {
    report
        .lines()
        .find(|l| l.contains("Token scopes:"))
        .map(|l| !l.contains(scope))
        .unwrap_or(false)
}

fn first_line(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unknown error")
        .to_string()
}
