//! Systemd user units.
use anyhow::Result;

use crate::logging::Log as _;

use super::{Context, Task, TaskResult, TaskStats};

/// Enable (and start) the declared systemd user units.
pub struct EnableUserUnits;

impl Task for EnableUserUnits {
    fn name(&self) -> &str {
        "enable user units"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.system.units.is_empty() && ctx.executor.which("systemctl")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();
        for unit in &ctx.config.system.units {
            if unit_enabled(ctx, unit)? {
                stats.already_ok += 1;
                continue;
            }
            if ctx.mode.is_preview() {
                ctx.log.dry_run(&format!("would enable {unit}"));
                stats.changed += 1;
                continue;
            }
            match ctx
                .executor
                .run("systemctl", &["--user", "enable", "--now", unit])
            {
                Ok(_) => {
                    ctx.log.debug(&format!("enabled {unit}"));
                    stats.changed += 1;
                }
                Err(e) => {
                    ctx.log.warn(&format!("could not enable {unit}: {e:#}"));
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}

/// Whether `systemctl --user is-enabled` reports the unit as enabled.
pub fn unit_enabled(ctx: &Context, unit: &str) -> Result<bool> {
    let result = ctx
        .executor
        .run_unchecked("systemctl", &["--user", "is-enabled", unit])?;
    Ok(result.success && result.stdout.trim() == "enabled")
}
