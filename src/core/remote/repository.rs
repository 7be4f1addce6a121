//! Current repository detection.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::RemoteError;

/// Derive `owner/name` for the repository checked out at `workdir` from its
/// `origin` remote.
///
/// # Errors
///
/// Returns `RemoteError::Repository` if git is unavailable, there is no
/// `origin` remote, or its URL cannot be parsed.
pub fn current_repository(workdir: &Path) -> Result<String, RemoteError> {
    let git = which::which("git").map_err(|_| RemoteError::Repository("git not found".into()))?;

    let output = Command::new(git)
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(workdir)
        .output()
        .map_err(|e| RemoteError::Repository(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        return Err(RemoteError::Repository(format!(
            "no origin remote configured in {}",
            workdir.display()
        )));
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let repo = parse_remote_url(&url)
        .ok_or_else(|| RemoteError::Repository(format!("unrecognized remote url: {}", url)))?;

    debug!(url = %url, repository = %repo, "detected current repository");
    Ok(repo)
}

/// Extract `owner/name` from an https, scp-style, or ssh remote URL.
pub fn parse_remote_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let path = if let Some((_, rest)) = url.split_once("://") {
        // https://host/owner/name, ssh://git@host:22/owner/name
        rest.split_once('/')?.1
    } else {
        // git@host:owner/name
        url.split_once(':')?.1
    };

    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let name = segments.next()?;
    let owner = segments.next()?;
    Some(format!("{}/{}", owner, name))
}
