//! Option commands.
//!
//! `option get` reads from the raw document, so it works even when the
//! `secrets` list is malformed. `option set` merges one key into the file.

use serde_json::Value;

use crate::cli::{output, GlobalArgs};
use crate::core::store;
use crate::core::validation;
use crate::error::{Error, Result};

/// Print an option value.
///
/// Strings print bare; everything else prints as JSON.
pub fn get(global: &GlobalArgs, key: &str) -> Result<()> {
    validation::option_path(key)?;
    let paths = global.paths()?;
    let document = store::read_document(&paths.store)?;

    match store::lookup_option(&document, key) {
        Some(Value::String(s)) => println!("{}", s),
        Some(value) => println!("{}", value),
        None => return Err(Error::Other(format!("option '{}' is not set", key))),
    }
    Ok(())
}

/// Set an option value.
pub fn set(global: &GlobalArgs, key: &str, raw: &str) -> Result<()> {
    let paths = global.paths()?;
    let value = parse_value(raw);
    store::write_option(&paths.store, key, value.clone())?;

    output::success(&format!("{} = {}", output::key(key), value));
    Ok(())
}

/// JSON literals become JSON values; anything else is a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
