//! System expectations from `conf/system.toml`, consumed by the verifier.
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use super::toml_loader::load_config;

/// Commands, user units, and group memberships the installed system must have.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemChecks {
    /// Binaries expected on PATH after install.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Systemd user units expected to be enabled.
    #[serde(default)]
    pub units: Vec<String>,
    /// Groups the user is expected to belong to.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Load the system expectations; a missing file expects nothing.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<SystemChecks> {
    load_config(path)
}
