//! Remote secret store.
//!
//! Abstracts the per-user, repository-scoped store the engine publishes to.
//!
//! ## Adding a New Remote
//!
//! 1. Implement the `RemoteStore` trait
//! 2. Add the implementation in a new file next to `gh.rs`
//! 3. Re-export from this module

mod exec;
mod gh;
mod repository;

pub use gh::GhCli;
pub use repository::{current_repository, parse_remote_url};

use crate::core::domain::{RemoteScope, ScopeLookup};
use crate::error::RemoteError;

/// Per-user secret storage scoped to repositories.
pub trait RemoteStore {
    /// Make sure an authenticated session with `scope` exists.
    ///
    /// Must be idempotent: calling it when already authenticated is a no-op.
    fn ensure_session(&self, scope: &str) -> Result<(), RemoteError>;

    /// Current repository scope of secret `name`.
    fn fetch_scope(&self, name: &str) -> Result<ScopeLookup, RemoteError>;

    /// Create or overwrite secret `name` with `value`, visible to `scope`.
    fn publish(&self, name: &str, value: &str, scope: &RemoteScope) -> Result<(), RemoteError>;
}
