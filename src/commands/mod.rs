//! Command entry points and shared setup.
pub mod install;
pub mod uninstall;
pub mod update;
pub mod verify;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::exec::{Executor, SystemExecutor};
use crate::ledger::Ledger;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Mode, Task};

/// Shared state produced by the common command setup sequence.
pub struct CommandSetup {
    /// Fully built task context.
    pub ctx: Context,
    /// Logger, kept separately so commands can print the summary.
    pub log: Arc<Logger>,
}

impl CommandSetup {
    /// Resolve the root, load all configuration, and build the task context.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined, a config file fails
    /// to parse, or `$HOME` is unset.
    pub fn init(global: &GlobalOpts, mode: Mode, assume_yes: bool) -> Result<Self> {
        let log = Arc::new(Logger::new());
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.info(&format!(
            "loaded {} mappings, {} packages",
            config.mappings.len(),
            config.packages.all().count()
        ));

        let home = home_dir()?;
        let ledger = Ledger::for_home(&home);
        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);

        let ctx = Context {
            config: Arc::new(config),
            log: Arc::clone(&log) as Arc<dyn Log>,
            mode,
            home,
            executor,
            ledger,
            assume_yes,
        };
        Ok(Self { ctx, log })
    }
}

/// Resolve the source repository root.
///
/// Precedence: `--root`, then `$NIRI_SETUP_ROOT`, then the current directory
/// when it contains `config/`.
///
/// # Errors
///
/// Returns an error when no candidate resolves.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("NIRI_SETUP_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir().context("reading current directory")?;
    if cwd.join("config").is_dir() {
        return Ok(cwd);
    }

    bail!("cannot determine repository root. Use --root or set NIRI_SETUP_ROOT")
}

fn home_dir() -> Result<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .context("HOME environment variable is not set")
}

/// Refuse to mutate the system as root; everything here is per-user state.
///
/// # Errors
///
/// Returns an error when the effective uid is 0.
pub fn ensure_not_root(ctx: &Context) -> Result<()> {
    let result = ctx.executor.run_unchecked("id", &["-u"])?;
    if result.stdout.trim() == "0" {
        bail!("refusing to run as root; run as the target user");
    }
    Ok(())
}

/// Execute every task in order, print the summary, and bail if any failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion(
    task_list: &[Box<dyn Task>],
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in task_list {
        tasks::execute(task.as_ref(), ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        bail!("{count} task(s) failed");
    }
    Ok(())
}
