//! Shared context threaded through every task.
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::ledger::Ledger;
use crate::logging::Log;

/// Execution mode for a run.
///
/// Carried explicitly in the [`Context`] and consulted by every mutating
/// operation; in [`Mode::Preview`] no filesystem mutation, ledger write, or
/// external mutating command happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Perform changes.
    Apply,
    /// Log what would change, touch nothing.
    Preview,
}

impl Mode {
    /// Whether this run only previews changes.
    #[must_use]
    pub const fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }
}

/// Shared context for task execution.
pub struct Context {
    /// Configuration loaded from the `conf/` TOML files.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Apply or Preview.
    pub mode: Mode,
    /// User's home directory.
    pub home: PathBuf,
    /// Command executor (real system calls, or a mock in tests).
    pub executor: Arc<dyn Executor>,
    /// Persistent record of created symlinks and installed packages.
    pub ledger: Ledger,
    /// Skip interactive confirmations (`--yes`).
    pub assume_yes: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("mode", &self.mode)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .field("ledger", &self.ledger)
            .field("assume_yes", &self.assume_yes)
            .finish()
    }
}

impl Context {
    /// Destination base for mapped config directories.
    #[must_use]
    pub fn config_home(&self) -> PathBuf {
        self.home.join(".config")
    }

    /// Destination for user scripts.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    /// Shell profile file carrying the managed blocks.
    #[must_use]
    pub fn profile_file(&self) -> PathBuf {
        self.home.join(".zprofile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::make_context;

    #[test]
    fn mode_preview_flag() {
        assert!(Mode::Preview.is_preview());
        assert!(!Mode::Apply.is_preview());
    }

    #[test]
    fn derived_paths_hang_off_home() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(dir.path(), Mode::Apply);
        assert_eq!(ctx.config_home(), ctx.home.join(".config"));
        assert_eq!(ctx.bin_dir(), ctx.home.join(".local/bin"));
        assert_eq!(ctx.profile_file(), ctx.home.join(".zprofile"));
    }
}
