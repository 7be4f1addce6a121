//! Update pipeline.
//!
//! ```text
//! freshness gate ─ fresh ──────────────────────────────▶ done
//!        │ stale / missing
//!        ▼
//! load store ─▶ resolve ─▶ write cache ─▶ reload cache ─▶ sync (optional)
//! ```

use std::time::Duration;

use tracing::{debug, info};

use crate::core::cache::LocalCache;
use crate::core::config::Paths;
use crate::core::constants;
use crate::core::domain::{Resolution, SyncReport};
use crate::core::freshness::{self, Freshness};
use crate::core::prompt::Prompter;
use crate::core::provider::ValueProvider;
use crate::core::remote::{self, GhCli, RemoteStore};
use crate::core::resolve;
use crate::core::store::DescriptorStore;
use crate::core::sync;
use crate::error::{RemoteError, Result};

/// Whether this process runs inside the remote-backed environment.
pub fn in_remote_environment() -> bool {
    std::env::var(constants::REMOTE_ENV_FLAG).is_ok_and(|v| v == "true")
}

/// What a pipeline run did.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Running inside the remote-backed environment; secrets come from there.
    RemoteEnvironment,
    /// The cache is at least as new as the store.
    UpToDate,
    /// Resolution ran and the cache was rewritten.
    Updated(UpdateReport),
}

/// Result of a pipeline run that rewrote the cache.
#[derive(Debug)]
pub struct UpdateReport {
    /// Freshness observed before the run.
    pub freshness: Freshness,
    pub resolution: Resolution,
    /// Entries as re-read from disk after writing.
    pub cache: LocalCache,
    /// `None` when remote sync is disabled for the store.
    pub sync: Option<std::result::Result<SyncReport, RemoteError>>,
}

impl UpdateReport {
    /// The sync phase failed before publishing anything.
    pub fn sync_error(&self) -> Option<&RemoteError> {
        self.sync.as_ref().and_then(|s| s.as_ref().err())
    }
}

/// Runs `update` and `reset` against a set of paths.
pub struct Engine<'a> {
    paths: Paths,
    provider: &'a dyn ValueProvider,
    prompter: &'a mut dyn Prompter,
    remote: Option<&'a dyn RemoteStore>,
    repository: Option<String>,
    timeout: Duration,
    remote_environment: bool,
}

impl<'a> Engine<'a> {
    pub fn new(
        paths: Paths,
        provider: &'a dyn ValueProvider,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            paths,
            provider,
            prompter,
            remote: None,
            repository: None,
            timeout: Duration::from_secs(constants::REMOTE_TIMEOUT_SECS),
            remote_environment: in_remote_environment(),
        }
    }

    /// Use `remote` instead of locating `gh`.
    pub fn with_remote(mut self, remote: &'a dyn RemoteStore) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Use `repository` instead of reading the git origin.
    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    /// Timeout for each remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override remote environment detection.
    pub fn with_remote_environment(mut self, remote_environment: bool) -> Self {
        self.remote_environment = remote_environment;
        self
    }

    /// Run the pipeline, skipping it when the cache is fresh.
    ///
    /// # Errors
    ///
    /// Fails on store load errors and cache I/O. Per-secret failures and sync
    /// phase failures are reported in the returned `UpdateReport`.
    pub fn update(&mut self) -> Result<UpdateOutcome> {
        if self.remote_environment {
            info!("remote environment detected, nothing to update");
            return Ok(UpdateOutcome::RemoteEnvironment);
        }

        let freshness = freshness::check(&self.paths.store, &self.paths.cache)?;
        if freshness.is_fresh() {
            debug!("cache is fresh");
            return Ok(UpdateOutcome::UpToDate);
        }
        info!(freshness = freshness.as_str(), "refreshing cache");

        let store = DescriptorStore::load(&self.paths.store)?;
        let previous = LocalCache::load(&self.paths.cache)?;

        let resolution = resolve::resolve_all(
            store.descriptors(),
            previous.as_ref(),
            self.provider,
            &mut *self.prompter,
        );

        LocalCache::from_resolution(&resolution).save(&self.paths.cache)?;
        let cache = LocalCache::load(&self.paths.cache)?.unwrap_or_default();

        let sync = if store.use_remote_store() {
            Some(self.sync(&cache))
        } else {
            debug!("remote store disabled");
            None
        };

        Ok(UpdateOutcome::Updated(UpdateReport {
            freshness,
            resolution,
            cache,
            sync,
        }))
    }

    /// Delete the cache, then run the full pipeline.
    pub fn reset(&mut self) -> Result<UpdateOutcome> {
        if self.remote_environment {
            info!("remote environment detected, nothing to reset");
            return Ok(UpdateOutcome::RemoteEnvironment);
        }

        if LocalCache::remove(&self.paths.cache)? {
            info!(path = %self.paths.cache.display(), "removed cache");
        }
        self.update()
    }

    fn sync(&self, cache: &LocalCache) -> std::result::Result<SyncReport, RemoteError> {
        let repository = match &self.repository {
            Some(repo) => repo.clone(),
            None => remote::current_repository(&self.paths.workdir)?,
        };

        let located;
        let remote: &dyn RemoteStore = match self.remote {
            Some(remote) => remote,
            None => {
                located = GhCli::locate(self.timeout)?;
                &located
            }
        };

        remote.ensure_session(constants::GH_SECRETS_SCOPE)?;
        sync::sync(remote, &repository, cache.entries())
    }
}
