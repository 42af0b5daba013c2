//! The verify command.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Log as _;
use crate::tasks::{self, Mode};

use super::{CommandSetup, run_tasks_to_completion};

/// Run every check against the deployed state.
///
/// Hard failures (broken symlinks, missing commands) make the command fail;
/// warnings (stale profile blocks, disabled units, missing group membership)
/// are enumerated in the summary but exit zero.
///
/// # Errors
///
/// Returns an error if setup fails or any hard check failed.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let setup = CommandSetup::init(global, Mode::Apply, false)?;
    run_tasks_to_completion(&tasks::verify_tasks(), &setup.ctx, &setup.log)?;

    let warnings = setup.log.warning_count();
    if warnings > 0 {
        setup
            .log
            .info(&format!("verified with {warnings} warning(s)"));
    }
    Ok(())
}
