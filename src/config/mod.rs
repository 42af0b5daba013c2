//! Declarative configuration loaded from `conf/` in the source repository.
pub mod mappings;
pub mod packages;
pub mod system;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// All loaded configuration for one run.
#[derive(Debug)]
pub struct Config {
    /// Root of the source repository.
    pub root: PathBuf,
    /// Ordered config-directory mappings.
    pub mappings: Vec<mappings::Mapping>,
    /// Declared package layer.
    pub packages: packages::Packages,
    /// Post-install system expectations.
    pub system: system::SystemChecks,
}

impl Config {
    /// Load all configuration from `<root>/conf/`.
    ///
    /// # Errors
    ///
    /// Returns an error when any present config file is malformed or a
    /// mapping source is duplicated.
    pub fn load(root: &Path) -> Result<Self> {
        let conf = root.join("conf");

        let mappings =
            mappings::load(&conf.join("mappings.toml")).context("loading mappings.toml")?;
        let packages =
            packages::load(&conf.join("packages.toml")).context("loading packages.toml")?;
        let system = system::load(&conf.join("system.toml")).context("loading system.toml")?;

        Ok(Self {
            root: root.to_path_buf(),
            mappings,
            packages,
            system,
        })
    }

    /// Directory holding the mapped config subdirectories.
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Flat directory of user scripts.
    #[must_use]
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.mappings.is_empty());
        assert!(config.packages.packages.is_empty());
        assert!(config.system.commands.is_empty());
        assert_eq!(config.config_dir(), dir.path().join("config"));
        assert_eq!(config.scripts_dir(), dir.path().join("scripts"));
    }

    #[test]
    fn load_full_conf_directory() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("conf");
        std::fs::create_dir_all(&conf).unwrap();
        std::fs::write(
            conf.join("mappings.toml"),
            "[[mapping]]\nsource = \"niri\"\ndest = \"niri\"\n",
        )
        .unwrap();
        std::fs::write(conf.join("packages.toml"), "packages = [\"niri\"]\n").unwrap();
        std::fs::write(conf.join("system.toml"), "commands = [\"niri\"]\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.mappings.len(), 1);
        assert_eq!(config.packages.packages, vec!["niri"]);
        assert_eq!(config.system.commands, vec!["niri"]);
    }

    #[test]
    fn malformed_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("conf");
        std::fs::create_dir_all(&conf).unwrap();
        std::fs::write(conf.join("packages.toml"), "packages = {\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
