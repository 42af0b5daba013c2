//! Named tasks that orchestrate resource changes, run strictly in order.
pub mod context;
pub mod packages;
pub mod shell;
pub mod sync;
pub mod uninstall;
pub mod units;
pub mod update;
pub mod verify;

use anyhow::Result;

pub use context::{Context, Mode};

use crate::logging::{Log as _, TaskStatus};
use crate::resources::ResourceChange;

/// Outcome of a task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed (including "nothing to do").
    Ok,
    /// Task could not do its work; the run continues.
    Skipped(String),
    /// Preview mode; changes were logged but not applied.
    DryRun,
}

/// Per-task change counters, summarized at the end of each task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Resources created or updated.
    pub changed: usize,
    /// Resources that were already correct.
    pub already_ok: usize,
    /// Resources skipped with a warning.
    pub skipped: usize,
}

impl TaskStats {
    /// Fold one resource outcome into the counters.
    pub fn record(&mut self, change: &ResourceChange) {
        match change {
            ResourceChange::Applied => self.changed += 1,
            ResourceChange::AlreadyCorrect => self.already_ok += 1,
            ResourceChange::Skipped { .. } => self.skipped += 1,
        }
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} changed, {} already ok, {} skipped",
            self.changed, self.already_ok, self.skipped
        )
    }

    /// Log the summary and convert the counters into a [`TaskResult`].
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary());
        if ctx.mode.is_preview() {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies on the current system.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when system commands fail
    /// or file operations are not permitted.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The ordered set of tasks run by the install command.
#[must_use]
pub fn install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallPackages),
        Box::new(packages::InstallAurPackages),
        Box::new(sync::SyncConfigs),
        Box::new(sync::SyncScripts),
        Box::new(shell::ConfigureProfileBlocks),
        Box::new(units::EnableUserUnits),
    ]
}

/// The ordered set of tasks run by the uninstall command.
#[must_use]
pub fn uninstall_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(uninstall::RemoveSymlinks),
        Box::new(shell::RemoveProfileBlocks),
        Box::new(packages::RemovePackages),
        Box::new(uninstall::ClearLedger),
    ]
}

/// The ordered set of checks run by the verify command.
#[must_use]
pub fn verify_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(verify::VerifySymlinks),
        Box::new(verify::VerifyCommands),
        Box::new(verify::VerifyProfileBlocks),
        Box::new(verify::VerifyUserUnits),
        Box::new(verify::VerifyGroups),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}
