//! Descriptor store.
//!
//! Reads the version-controlled JSON file that declares which secrets a
//! development environment needs:
//!
//! ```json
//! {
//!   "options": { "useGitHubUserSecrets": true },
//!   "secrets": [
//!     { "environmentVariable": "API_KEY", "description": "API key", "shellscript": "" }
//!   ]
//! }
//! ```
//!
//! The engine never writes descriptors. The only write path is
//! [`write_option`], a read-merge-write of a single key under `options`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::SecretDescriptor;
use crate::core::fs;
use crate::core::validation::{option_path, validate_name};
use crate::error::{ConfigError, Result};

/// Typed view of the `options` object.
#[derive(Debug, Clone, Default, Deserialize)]
struct Options {
    #[serde(rename = "useGitHubUserSecrets", default)]
    use_remote_store: bool,
}

#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    options: Options,
    #[serde(default)]
    secrets: Vec<SecretDescriptor>,
}

/// The loaded descriptor store.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    path: PathBuf,
    descriptors: Vec<SecretDescriptor>,
    use_remote_store: bool,
    document: Value,
}

impl DescriptorStore {
    /// Load and validate the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if it is not valid JSON of the expected shape,
    /// and `InvalidSecretName` / `DuplicateSecret` for bad descriptors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading descriptor store");

        let document = read_document(path)?;
        let file: StoreFile =
            serde_json::from_value(document.clone()).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self {
            path: path.to_path_buf(),
            descriptors: file.secrets,
            use_remote_store: file.options.use_remote_store,
            document,
        };
        store.validate()?;

        debug!(
            secrets = store.descriptors.len(),
            remote = store.use_remote_store,
            "descriptor store loaded"
        );

        Ok(store)
    }

    /// Write the default empty store if `path` does not exist.
    ///
    /// Returns `true` if a file was created.
    pub fn create_default(path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }

        let mut options = Map::new();
        options.insert(constants::REMOTE_OPTION.to_string(), Value::Bool(false));
        let mut root = Map::new();
        root.insert("options".to_string(), Value::Object(options));
        root.insert("secrets".to_string(), Value::Array(Vec::new()));

        write_document(path, &Value::Object(root))?;
        debug!(path = %path.display(), "created default descriptor store");
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[SecretDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Whether resolved values should be published to the remote store.
    pub fn use_remote_store(&self) -> bool {
        self.use_remote_store
    }

    /// Look up an arbitrary option by dotted key (`login.azure.tenant`).
    ///
    /// Unknown keys return `None`.
    pub fn get_option(&self, key: &str) -> Option<Value> {
        lookup_option(&self.document, key)
    }

    /// Modification time of the store file.
    pub fn modified(&self) -> Result<Option<SystemTime>> {
        fs::modified(&self.path)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for descriptor in &self.descriptors {
            validate_name(&descriptor.name)?;
            if !seen.insert(descriptor.name.as_str()) {
                return Err(ConfigError::DuplicateSecret(descriptor.name.clone()).into());
            }
        }
        Ok(())
    }
}

/// Read the raw JSON document at `path`.
pub fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Look up `options.<key>` in a raw document.
pub fn lookup_option(document: &Value, key: &str) -> Option<Value> {
    let segments = option_path(key).ok()?;
    let mut node = document.get("options")?;
    for segment in segments {
        node = node.get(segment)?;
    }
    Some(node.clone())
}

/// Set `options.<key>` to `value` in the store file, keeping every other key.
///
/// Starts from `{}` if the file does not exist. The write goes through a
/// temp file and rename; an existing file keeps its permissions.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if the existing file is not valid JSON, so a
/// corrupt file is never overwritten.
pub fn write_option(path: impl AsRef<Path>, key: &str, value: Value) -> Result<()> {
    let path = path.as_ref();
    let segments = option_path(key)?;

    let mut document = if path.exists() {
        read_document(path)?
    } else {
        Value::Object(Map::new())
    };

    let root = as_object(&mut document, path)?;
    let mut node = root
        .entry("options".to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| ConfigError::InvalidOptionKey(key.to_string()))?;
    for segment in parents {
        let object = as_object(node, path)?;
        node = object
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_object(node, path)?.insert((*last).to_string(), value);

    debug!(path = %path.display(), key, "writing option");
    write_document(path, &document)
}

/// Coerce a JSON node into an object, replacing scalars in place.
///
/// Arrays are a schema error. Scalars on the way to a deeper key are replaced,
/// since the caller asked for that key explicitly.
fn as_object<'a>(node: &'a mut Value, path: &Path) -> Result<&'a mut Map<String, Value>> {
    if node.is_array() {
        return Err(ConfigError::Parse {
            path: path.to_path_buf(),
            source: serde::de::Error::custom("expected a JSON object, found an array"),
        }
        .into());
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut().ok_or_else(|| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source: serde::de::Error::custom("expected a JSON object"),
        }
        .into()
    })
}

fn write_document(path: &Path, document: &Value) -> Result<()> {
    let mut contents = serde_json::to_string_pretty(document).map_err(ConfigError::Serialize)?;
    contents.push('\n');
    fs::write_atomic(path, contents.as_bytes(), fs::mode_or(path, 0o644))
}
