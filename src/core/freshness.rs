//! Freshness gate.
//!
//! Whole-store granularity: any edit to the descriptor store invalidates the
//! cache as a whole.

use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::core::fs;
use crate::error::{ConfigError, Result};

/// Whether the cache can be reused as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Cache is at least as new as the store.
    Fresh,
    /// Store was modified after the cache was written.
    Stale,
    /// No cache exists.
    Missing,
}

impl Freshness {
    pub fn is_fresh(self) -> bool {
        self == Self::Fresh
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Missing => "missing",
        }
    }
}

/// Compare the cache and store modification times.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the store does not exist.
pub fn check(store: &Path, cache: &Path) -> Result<Freshness> {
    let store_mtime =
        fs::modified(store)?.ok_or_else(|| ConfigError::NotFound(store.to_path_buf()))?;
    let freshness = compare(store_mtime, fs::modified(cache)?);
    debug!(
        store = %store.display(),
        cache = %cache.display(),
        freshness = freshness.as_str(),
        "freshness check"
    );
    Ok(freshness)
}

/// `cache >= store` means fresh.
pub fn compare(store: SystemTime, cache: Option<SystemTime>) -> Freshness {
    match cache {
        None => Freshness::Missing,
        Some(cache) if cache >= store => Freshness::Fresh,
        Some(_) => Freshness::Stale,
    }
}
