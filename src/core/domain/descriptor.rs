//! Secret descriptor type.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One declared secret requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDescriptor {
    /// Environment variable the secret is exported as.
    #[serde(rename = "environmentVariable")]
    pub name: String,
    /// Prompt text shown when no provider is declared.
    #[serde(default)]
    pub description: String,
    /// Path to a provider script; empty means "prompt".
    #[serde(rename = "shellscript", default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

impl SecretDescriptor {
    /// Create a descriptor without a provider.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            provider: String::new(),
        }
    }

    /// Attach a provider script.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Provider path, if one is declared.
    ///
    /// Relative paths are resolved against `base` (the working directory the
    /// engine runs in). A leading `~/` expands to the home directory.
    pub fn provider_path(&self, base: &Path) -> Option<PathBuf> {
        let raw = self.provider.trim();
        if raw.is_empty() {
            return None;
        }
        let path = expand_home(raw);
        if path.is_absolute() {
            Some(path)
        } else {
            Some(base.join(path))
        }
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
