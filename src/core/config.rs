//! Path configuration.
//!
//! Resolves where the descriptor store and the local cache live. Both can be
//! overridden from the command line or environment (`CUBBY_STORE`,
//! `CUBBY_CACHE`); the defaults are `.devcontainer/secrets.json` in the
//! working directory and `~/.cubby/<project>.sh`.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Locations the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Descriptor store file.
    pub store: PathBuf,
    /// Generated cache script.
    pub cache: PathBuf,
    /// Directory providers and git run in.
    pub workdir: PathBuf,
}

impl Paths {
    /// Resolve paths relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if no cache override is given and the
    /// home directory cannot be determined.
    pub fn resolve(store: Option<PathBuf>, cache: Option<PathBuf>) -> Result<Self> {
        let workdir = std::env::current_dir()?;
        Self::resolve_in(&workdir, store, cache)
    }

    /// Resolve paths relative to `workdir`.
    pub fn resolve_in(
        workdir: &Path,
        store: Option<PathBuf>,
        cache: Option<PathBuf>,
    ) -> Result<Self> {
        let store = absolutize(
            workdir,
            store.unwrap_or_else(|| PathBuf::from(constants::STORE_FILE)),
        );

        let cache = match cache {
            Some(path) => absolutize(workdir, path),
            None => default_cache_path(workdir)?,
        };

        let paths = Self {
            store,
            cache,
            workdir: workdir.to_path_buf(),
        };
        debug!(
            store = %paths.store.display(),
            cache = %paths.cache.display(),
            "resolved paths"
        );
        Ok(paths)
    }
}

/// Project identifier: the working directory name plus a short hash of its
/// canonical path.
///
/// Keys the default cache file and the shell hook block, so two checkouts
/// with the same directory name never share either.
pub fn project_id(workdir: &Path) -> String {
    let name = workdir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "default".to_string());

    let canonical = std::fs::canonicalize(workdir).unwrap_or_else(|_| workdir.to_path_buf());
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    format!("{}-{}", name, hex::encode(&hasher.finalize()[..4]))
}

/// `~/.cubby/<project>.sh`
pub fn default_cache_path(workdir: &Path) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home
        .join(constants::CACHE_DIR)
        .join(format!("{}.{}", project_id(workdir), constants::CACHE_EXT)))
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
