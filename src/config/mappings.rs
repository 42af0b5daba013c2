//! Config Mapping: which source subdirectories land where under ~/.config.
use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::error::ConfigError;

use super::toml_loader::load_config;

/// One `[[mapping]]` entry from `conf/mappings.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Mapping {
    /// Subdirectory of `config/` in the source repository.
    pub source: String,
    /// Directory name under `$HOME/.config/`.
    pub dest: String,
}

#[derive(Debug, Deserialize)]
struct MappingsFile {
    #[serde(default)]
    mapping: Vec<Mapping>,
}

/// Load the ordered mapping list, enforcing source uniqueness.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateSource`] when two entries share a source,
/// or a load error from the TOML layer.
pub fn load(path: &Path) -> Result<Vec<Mapping>> {
    let file: MappingsFile = load_config(path)?;
    let mut seen = HashSet::new();
    for mapping in &file.mapping {
        if !seen.insert(mapping.source.as_str()) {
            return Err(ConfigError::DuplicateSource(mapping.source.clone()).into());
        }
    }
    Ok(file.mapping)
}
