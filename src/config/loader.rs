//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ConfigTable;

/// Load a flat key-value configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed. Individual values
/// are never rejected here; they are interpreted when settings are resolved.
///
/// # Example
///
/// ```rust,ignore
/// use actuator_homing::{load_config, HomingSettings};
///
/// let table = load_config("config.toml")?;
/// let settings = HomingSettings::resolve(&table, &[80.0, 80.0, 400.0]);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConfigTable> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse a flat key-value configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid, nests tables, or holds more keys
/// than a [`ConfigTable`] can store.
pub fn parse_config(content: &str) -> Result<ConfigTable> {
    toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })
}

fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
