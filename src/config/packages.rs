//! Package lists from `conf/packages.toml`.
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use super::toml_loader::load_config;

/// Declared package layer: official repositories plus AUR.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Packages {
    /// Packages installed with pacman.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Packages installed with paru.
    #[serde(default)]
    pub aur: Vec<String>,
}

impl Packages {
    /// All declared package names, repo and AUR alike.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .chain(self.aur.iter())
            .map(String::as_str)
    }
}

/// Load the package lists; a missing file declares nothing.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Packages> {
    load_config(path)
}
