//! Managed blocks in the shell profile.
use std::path::Path;

use anyhow::Result;

use crate::logging::Log as _;
use crate::resources::text_block::ManagedBlockResource;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

use super::{Context, Task, TaskResult, TaskStats};

const SESSION_BLOCK: &str = "\
if [ -z \"$WAYLAND_DISPLAY\" ] && [ \"$(tty)\" = \"/dev/tty1\" ]; then
    exec niri --session
fi";

const ENV_BLOCK: &str = "\
export MOZ_ENABLE_WAYLAND=1
export QT_QPA_PLATFORM=wayland
export ELECTRON_OZONE_PLATFORM_HINT=auto";

/// The managed blocks this tool owns in the profile file.
#[must_use]
pub fn profile_blocks(profile: &Path) -> Vec<ManagedBlockResource> {
    vec![
        ManagedBlockResource::new(
            profile.to_path_buf(),
            "session".to_string(),
            SESSION_BLOCK.to_string(),
        ),
        ManagedBlockResource::new(
            profile.to_path_buf(),
            "env".to_string(),
            ENV_BLOCK.to_string(),
        ),
    ]
}

/// Write the session-selector and environment blocks into the profile.
pub struct ConfigureProfileBlocks;

impl Task for ConfigureProfileBlocks {
    fn name(&self) -> &str {
        "configure profile"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();
        for block in profile_blocks(&ctx.profile_file()) {
            match block.current_state()? {
                ResourceState::Correct => stats.already_ok += 1,
                _ => {
                    if ctx.mode.is_preview() {
                        ctx.log
                            .dry_run(&format!("would write {}", block.description()));
                    } else {
                        block.apply()?;
                        ctx.log.debug(&format!("wrote {}", block.description()));
                    }
                    stats.changed += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}

/// Strip the managed blocks from the profile; the file itself stays.
pub struct RemoveProfileBlocks;

impl Task for RemoveProfileBlocks {
    fn name(&self) -> &str {
        "remove profile blocks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();
        for block in profile_blocks(&ctx.profile_file()) {
            if ctx.mode.is_preview() {
                ctx.log
                    .dry_run(&format!("would remove {}", block.description()));
                stats.changed += 1;
                continue;
            }
            let change = block.remove()?;
            stats.record(&change);
        }
        Ok(stats.finish(ctx))
    }
}
