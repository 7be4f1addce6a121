//! Remote sync engine.
//!
//! For every cached secret: fetch its scope, add the current repository, and
//! republish. Each secret is independent; a failure skips that secret only.
//! A fatal error (see [`RemoteError::is_fatal`]) ends the pass.

use tracing::{debug, info, warn};

use crate::core::cache::CacheEntry;
use crate::core::domain::{SyncEntry, SyncOutcome, SyncReport};
use crate::core::remote::RemoteStore;
use crate::error::RemoteError;

/// Publish `entries` for `repository`.
///
/// # Errors
///
/// Returns the first fatal remote error, such as `gh` disappearing or the
/// session being revoked mid-pass.
pub fn sync(
    remote: &dyn RemoteStore,
    repository: &str,
    entries: &[CacheEntry],
) -> Result<SyncReport, RemoteError> {
    info!(repository, secrets = entries.len(), "syncing secrets to remote store");

    let mut report = SyncReport {
        repository: repository.to_string(),
        entries: Vec::with_capacity(entries.len()),
    };

    for entry in entries {
        let outcome = match sync_one(remote, repository, entry) {
            SyncOutcome::Skipped(e) if e.is_fatal() => return Err(e),
            outcome => outcome,
        };
        report.entries.push(SyncEntry {
            name: entry.name.clone(),
            outcome,
        });
    }

    Ok(report)
}

fn sync_one(remote: &dyn RemoteStore, repository: &str, entry: &CacheEntry) -> SyncOutcome {
    let mut scope = match remote.fetch_scope(&entry.name) {
        Ok(lookup) => lookup.into_scope(),
        Err(e) => {
            warn!(name = %entry.name, error = %e, "scope fetch failed, skipping publish");
            return SyncOutcome::Skipped(e);
        }
    };

    let added = scope.merge(repository);
    debug!(name = %entry.name, scope = %scope, added, "publishing");

    // Always republish: the value may have changed even if the scope did not.
    match remote.publish(&entry.name, &entry.value, &scope) {
        Ok(()) => SyncOutcome::Published { scope, added },
        Err(e) => {
            warn!(name = %entry.name, error = %e, "publish failed");
            SyncOutcome::Skipped(e)
        }
    }
}
