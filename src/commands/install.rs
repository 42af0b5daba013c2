//! The install command.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::tasks::{self, Mode};

use super::{CommandSetup, ensure_not_root, run_tasks_to_completion};

/// Run the install flow: packages, config symlinks, profile, user units.
///
/// # Errors
///
/// Returns an error if setup fails, the command runs as root, or any task
/// records a failure.
pub fn run(global: &GlobalOpts, mode: Mode) -> Result<()> {
    let setup = CommandSetup::init(global, mode, false)?;
    ensure_not_root(&setup.ctx)?;
    run_tasks_to_completion(&tasks::install_tasks(), &setup.ctx, &setup.log)
}
