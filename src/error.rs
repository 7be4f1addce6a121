//! Error types.
//!
//! Fatal errors (`ConfigError`, repository/auth failures) abort the run.
//! Descriptor-level errors (`ResolveError`, most `RemoteError`s) are
//! collected by the pipeline and reported without changing the exit code.
//! `ResolveError` has no conversion into `Error`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Descriptor store and path errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("secrets file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize secrets file: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid secret name '{name}': {reason}")]
    InvalidSecretName { name: String, reason: String },

    #[error("secret '{0}' is declared more than once")]
    DuplicateSecret(String),

    #[error("invalid option key '{0}'")]
    InvalidOptionKey(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Per-descriptor resolution failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("provider for {name} not found: {}", path.display())]
    ProviderMissing { name: String, path: PathBuf },

    #[error("provider for {name} failed: {reason}")]
    ProviderFailed { name: String, reason: String },

    #[error("prompt for {name} failed: {reason}")]
    Prompt { name: String, reason: String },
}

impl ResolveError {
    /// Name of the descriptor this error belongs to.
    pub fn name(&self) -> &str {
        match self {
            Self::ProviderMissing { name, .. }
            | Self::ProviderFailed { name, .. }
            | Self::Prompt { name, .. } => name,
        }
    }
}

/// Remote store failures.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("cannot determine current repository: {0}")]
    Repository(String),

    #[error("gh CLI not found on PATH")]
    GhNotFound,

    #[error("authentication with GitHub failed: {0}")]
    Auth(String),

    #[error("failed to fetch repositories for {name}: {reason}")]
    ScopeFetch { name: String, reason: String },

    #[error("failed to publish {name}: {reason}")]
    Publish { name: String, reason: String },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },
}

impl RemoteError {
    /// Whether this error stops the whole sync phase rather than one secret.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::GhNotFound | Self::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
