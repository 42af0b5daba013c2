//! The uninstall command.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::tasks::{self, Mode};

use super::{CommandSetup, ensure_not_root, run_tasks_to_completion};

/// Reverse everything the ledger records: symlinks, profile blocks, packages.
///
/// Package removal prompts for confirmation unless `yes` is set.
///
/// # Errors
///
/// Returns an error if setup fails, the command runs as root, or any task
/// records a failure.
pub fn run(global: &GlobalOpts, mode: Mode, yes: bool) -> Result<()> {
    let setup = CommandSetup::init(global, mode, yes)?;
    ensure_not_root(&setup.ctx)?;
    run_tasks_to_completion(&tasks::uninstall_tasks(), &setup.ctx, &setup.log)
}
