//! Generic TOML configuration file parsing.
use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Deserialize a TOML config file.
///
/// A missing file deserializes from the empty document, so config types give
/// every field a `#[serde(default)]`. A file that exists but cannot be read
/// or parsed is a typed error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::InvalidSyntax`].
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return toml::from_str("").map_err(|e| {
            ConfigError::InvalidSyntax {
                file: path.to_path_buf(),
                message: e.message().to_string(),
            }
            .into()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| {
        ConfigError::InvalidSyntax {
            file: path.to_path_buf(),
            message: e.message().to_string(),
        }
        .into()
    })
}
