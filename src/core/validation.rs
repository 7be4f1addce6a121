//! Input validation for descriptor names and option keys.

use crate::error::{ConfigError, Result};

/// Validate a secret name.
///
/// Secret names double as environment variable names:
/// - Only ASCII letters, digits, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ConfigError::InvalidSecretName` if the name is invalid.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: String| -> crate::error::Error {
        ConfigError::InvalidSecretName {
            name: name.to_string(),
            reason,
        }
        .into()
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty".to_string()));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("cannot start with a digit".to_string()));
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(invalid(format!(
                "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                ch,
                i + 1
            )));
        }
    }

    Ok(())
}

/// Split a dotted option key (`login.azure.tenant`) into its segments.
///
/// # Errors
///
/// Returns `ConfigError::InvalidOptionKey` for empty keys or empty segments.
pub fn option_path(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::InvalidOptionKey(key.to_string()).into());
    }
    Ok(segments)
}
