use crate::core::domain::RemoteScope;
use crate::error::RemoteError;

/// Final state of one secret after a sync pass.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Published under the given scope; `added` is true if the current
    /// repository was not in the scope before.
    Published { scope: RemoteScope, added: bool },
    /// Scope fetch or publish failed; the secret was left as it was.
    Skipped(RemoteError),
}

/// Per-secret outcome of a sync pass.
#[derive(Debug)]
pub struct SyncEntry {
    pub name: String,
    pub outcome: SyncOutcome,
}

/// Result of a sync operation.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Repository the secrets were published for
    pub repository: String,
    /// One entry per secret, in declaration order
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    /// Number of secrets published
    pub fn published(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, SyncOutcome::Published { .. }))
            .count()
    }

    /// Secrets that were skipped, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RemoteError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            SyncOutcome::Skipped(err) => Some((e.name.as_str(), err)),
            SyncOutcome::Published { .. } => None,
        })
    }
}
