//! Source repository update.
use anyhow::Result;

use crate::logging::Log as _;

use super::{Context, Task, TaskResult};

/// Fast-forward the source repository before an install flow.
///
/// A failed pull (offline, diverged history) keeps the local copy and
/// downgrades to a skip so the rest of the update can proceed.
pub struct UpdateRepository;

impl Task for UpdateRepository {
    fn name(&self) -> &str {
        "update repository"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("git") && ctx.config.root.join(".git").exists()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.mode.is_preview() {
            ctx.log.dry_run(&format!(
                "would pull {} (--ff-only)",
                ctx.config.root.display()
            ));
            return Ok(TaskResult::DryRun);
        }

        match ctx
            .executor
            .run_in(&ctx.config.root, "git", &["pull", "--ff-only"])
        {
            Ok(result) => {
                ctx.log.debug(result.stdout.trim());
                Ok(TaskResult::Ok)
            }
            Err(e) => {
                ctx.log.warn(&format!("pull failed, keeping local copy: {e:#}"));
                Ok(TaskResult::Skipped("git pull failed".to_string()))
            }
        }
    }
}
