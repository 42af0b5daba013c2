//! Read-only checks that the deployed state matches the source tree.
//!
//! A hard failure (missing managed symlink, missing command) makes the check
//! task fail and the verify command exit non-zero. Softer findings (profile
//! block absent, unit disabled, group membership missing) are warnings that
//! leave the exit code alone. Checks never stop each other.
use anyhow::{Result, bail};

use crate::logging::Log as _;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

use super::shell::profile_blocks;
use super::sync::{expected_config_links, expected_script_links};
use super::units::unit_enabled;
use super::{Context, Task, TaskResult};

/// Every expected symlink must exist and resolve to its source.
pub struct VerifySymlinks;

impl Task for VerifySymlinks {
    fn name(&self) -> &str {
        "verify symlinks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let set = expected_config_links(&ctx.config, &ctx.config_home())?;
        for source in &set.missing_sources {
            ctx.log.warn(&format!("source missing: config/{source}"));
        }

        let mut links = set.links;
        links.extend(expected_script_links(&ctx.config, &ctx.bin_dir())?);

        let mut broken = 0usize;
        let mut checked = 0usize;
        for link in &links {
            checked += 1;
            match link.current_state()? {
                ResourceState::Correct => {}
                state => {
                    ctx.log.error(&format!(
                        "broken: {} ({})",
                        link.description(),
                        describe(&state)
                    ));
                    broken += 1;
                }
            }
        }

        if broken > 0 {
            bail!("{broken} of {checked} symlinks broken");
        }
        ctx.log.info(&format!("{checked} symlinks ok"));
        if set.missing_sources.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Skipped(format!(
                "{} mapping sources missing",
                set.missing_sources.len()
            )))
        }
    }
}

fn describe(state: &ResourceState) -> &str {
    match state {
        ResourceState::Missing => "missing",
        ResourceState::Correct => "ok",
        ResourceState::Incorrect { current } => current,
        ResourceState::Invalid { reason } => reason,
    }
}

/// Every declared command must be on PATH.
pub struct VerifyCommands;

impl Task for VerifyCommands {
    fn name(&self) -> &str {
        "verify commands"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.system.commands.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let missing: Vec<&str> = ctx
            .config
            .system
            .commands
            .iter()
            .map(String::as_str)
            .filter(|command| !ctx.executor.which(command))
            .collect();

        if !missing.is_empty() {
            bail!("commands not on PATH: {}", missing.join(", "));
        }
        ctx.log
            .info(&format!("{} commands ok", ctx.config.system.commands.len()));
        Ok(TaskResult::Ok)
    }
}

/// The managed profile blocks should be present and current.
pub struct VerifyProfileBlocks;

impl Task for VerifyProfileBlocks {
    fn name(&self) -> &str {
        "verify profile blocks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stale = Vec::new();
        for block in profile_blocks(&ctx.profile_file()) {
            match block.current_state()? {
                ResourceState::Correct => {}
                _ => {
                    ctx.log.warn(&format!("not current: {}", block.description()));
                    stale.push(block.name.clone());
                }
            }
        }
        if stale.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Skipped(format!(
                "blocks not current: {}",
                stale.join(", ")
            )))
        }
    }
}

/// Declared user units should report as enabled.
pub struct VerifyUserUnits;

impl Task for VerifyUserUnits {
    fn name(&self) -> &str {
        "verify user units"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.system.units.is_empty() && ctx.executor.which("systemctl")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut disabled = Vec::new();
        for unit in &ctx.config.system.units {
            if !unit_enabled(ctx, unit)? {
                ctx.log.warn(&format!("not enabled: {unit}"));
                disabled.push(unit.clone());
            }
        }
        if disabled.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Skipped(format!(
                "units not enabled: {}",
                disabled.join(", ")
            )))
        }
    }
}

/// The user should belong to the declared groups.
pub struct VerifyGroups;

impl Task for VerifyGroups {
    fn name(&self) -> &str {
        "verify groups"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.system.groups.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let result = ctx.executor.run_unchecked("id", &["-nG"])?;
        if !result.success {
            ctx.log.warn("could not read group membership");
            return Ok(TaskResult::Skipped("id -nG failed".to_string()));
        }
        let member: Vec<&str> = result.stdout.split_whitespace().collect();
        let missing: Vec<&str> = ctx
            .config
            .system
            .groups
            .iter()
            .map(String::as_str)
            .filter(|group| !member.contains(group))
            .collect();

        if missing.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            for group in &missing {
                ctx.log.warn(&format!("not a member of: {group}"));
            }
            Ok(TaskResult::Skipped(format!(
                "missing groups: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::mappings::Mapping;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::Mode;
    use crate::tasks::sync::SyncConfigs;
    use crate::tasks::test_helpers::{WhichExecutor, empty_config, make_context_with};
    use std::sync::Arc;

    fn mapped_context(home: &std::path::Path) -> Context {
        let mut config = empty_config(home.join("repo"));
        config.mappings = vec![Mapping {
            source: "niri".to_string(),
            dest: "niri".to_string(),
        }];
        let source = home.join("repo/config/niri/config.kdl");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "layout {}").unwrap();
        make_context_with(config, home, Mode::Apply, Arc::new(WhichExecutor::default()))
    }

    #[test]
    fn symlinks_pass_after_sync() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mapped_context(dir.path());
        SyncConfigs.run(&ctx).unwrap();
        assert_eq!(VerifySymlinks.run(&ctx).unwrap(), TaskResult::Ok);
    }

    #[test]
    fn missing_symlink_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mapped_context(dir.path());
        assert!(VerifySymlinks.run(&ctx).is_err());
    }

    #[test]
    fn deleted_link_fails_after_sync() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = mapped_context(dir.path());
        SyncConfigs.run(&ctx).unwrap();
        std::fs::remove_file(dir.path().join(".config/niri/config.kdl")).unwrap();
        assert!(VerifySymlinks.run(&ctx).is_err());
    }

    #[test]
    fn missing_mapping_source_is_warning_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.mappings = vec![Mapping {
            source: "absent".to_string(),
            dest: "absent".to_string(),
        }];
        let ctx = make_context_with(config, dir.path(), Mode::Apply, Arc::new(WhichExecutor::default()));
        assert!(matches!(
            VerifySymlinks.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn commands_fail_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.commands = vec!["niri".to_string()];
        let ctx = make_context_with(config, dir.path(), Mode::Apply, Arc::new(WhichExecutor::default()));
        assert!(VerifyCommands.should_run(&ctx));
        let err = VerifyCommands.run(&ctx).unwrap_err();
        assert!(err.to_string().contains("niri"));
    }

    #[test]
    fn commands_pass_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.commands = vec!["niri".to_string()];
        let exec = Arc::new(WhichExecutor { which_result: true });
        let ctx = make_context_with(config, dir.path(), Mode::Apply, exec);
        assert_eq!(VerifyCommands.run(&ctx).unwrap(), TaskResult::Ok);
    }

    #[test]
    fn missing_profile_block_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context_with(
            empty_config(dir.path().join("repo")),
            dir.path(),
            Mode::Apply,
            Arc::new(WhichExecutor::default()),
        );
        assert!(matches!(
            VerifyProfileBlocks.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn disabled_unit_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.units = vec!["waybar.service".to_string()];
        let exec = Arc::new(
            MockExecutor::with_responses(vec![(false, "disabled\n".to_string())]).with_which(true),
        );
        let ctx = make_context_with(config, dir.path(), Mode::Apply, exec);
        assert!(matches!(
            VerifyUserUnits.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn group_membership_checks_id_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.groups = vec!["video".to_string(), "input".to_string()];
        let exec = Arc::new(MockExecutor::ok("wheel video audio\n"));
        let ctx = make_context_with(config, dir.path(), Mode::Apply, exec);
        let result = VerifyGroups.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::Skipped("missing groups: input".to_string()));
    }

    #[test]
    fn unreadable_group_membership_is_warning_not_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.groups = vec!["video".to_string()];
        let exec = Arc::new(MockExecutor::fail());
        let ctx = make_context_with(config, dir.path(), Mode::Apply, exec);
        let result = VerifyGroups.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::Skipped("id -nG failed".to_string()));
    }

    #[test]
    fn group_membership_passes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().join("repo"));
        config.system.groups = vec!["video".to_string()];
        let exec = Arc::new(MockExecutor::ok("wheel video\n"));
        let ctx = make_context_with(config, dir.path(), Mode::Apply, exec);
        assert_eq!(VerifyGroups.run(&ctx).unwrap(), TaskResult::Ok);
    }
}
