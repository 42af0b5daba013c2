//! The update command: pull the source repository, then install.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::tasks::update::UpdateRepository;
use crate::tasks::{self, Context, Mode};

use super::{CommandSetup, ensure_not_root, run_tasks_to_completion};

/// Run the update flow.
///
/// The pull happens first and the configuration is reloaded afterwards, so
/// the install flow sees mappings and package lists from the fresh checkout.
/// A failed pull is a warning; the install flow still runs on the local copy.
///
/// # Errors
///
/// Returns an error if setup fails, the command runs as root, the reloaded
/// configuration is invalid, or any task records a failure.
pub fn run(global: &GlobalOpts, mode: Mode) -> Result<()> {
    let setup = CommandSetup::init(global, mode, false)?;
    ensure_not_root(&setup.ctx)?;

    tasks::execute(&UpdateRepository, &setup.ctx);

    let ctx = reload_config(&setup.ctx)?;
    run_tasks_to_completion(&tasks::install_tasks(), &ctx, &setup.log)
}

/// Rebuild the context with configuration re-read from disk.
fn reload_config(ctx: &Context) -> Result<Context> {
    let config = Config::load(&ctx.config.root)?;
    Ok(Context {
        config: Arc::new(config),
        log: Arc::clone(&ctx.log),
        mode: ctx.mode,
        home: ctx.home.clone(),
        executor: Arc::clone(&ctx.executor),
        ledger: ctx.ledger.clone(),
        assume_yes: ctx.assume_yes,
    })
}
