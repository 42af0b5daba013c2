//! Ledger-driven removal of managed symlinks.
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::ledger::Category;
use crate::logging::Log as _;

use super::{Context, Task, TaskResult, TaskStats};

/// Remove every symlink recorded in the ledger, then prune empty directories.
///
/// Only actual symlinks are deleted. A ledger path that now holds a regular
/// file (the user replaced the link) is left alone with a warning; absent
/// paths are noted and skipped.
pub struct RemoveSymlinks;

impl Task for RemoveSymlinks {
    fn name(&self) -> &str {
        "remove symlinks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let entries = ctx.ledger.list(Category::File);
        if entries.is_empty() {
            return Ok(TaskResult::Skipped("nothing recorded".to_string()));
        }

        if ctx.mode.is_preview() {
            for entry in &entries {
                ctx.log.dry_run(&format!("would remove {entry}"));
            }
            return Ok(TaskResult::DryRun);
        }

        let mut stats = TaskStats::default();
        let mut removed_from: Vec<PathBuf> = Vec::new();
        for entry in &entries {
            let path = PathBuf::from(entry);
            match std::fs::symlink_metadata(&path) {
                Err(_) => {
                    ctx.log.debug(&format!("already absent: {entry}"));
                    stats.already_ok += 1;
                }
                Ok(meta) if !meta.is_symlink() => {
                    ctx.log
                        .warn(&format!("not a symlink, leaving in place: {entry}"));
                    stats.skipped += 1;
                }
                Ok(_) => {
                    std::fs::remove_file(&path)?;
                    if let Err(e) = ctx.ledger.remove_entry(Category::File, entry) {
                        ctx.log.warn(&format!("could not drop entry {entry}: {e:#}"));
                    }
                    if let Some(parent) = path.parent() {
                        removed_from.push(parent.to_path_buf());
                    }
                    stats.changed += 1;
                }
            }
        }

        prune_empty_dirs(&removed_from, &ctx.home);
        Ok(stats.finish(ctx))
    }
}

/// Walk each directory chain upward, deleting directories that emptied out.
///
/// `remove_dir` is never recursive, so a directory holding anything foreign
/// (including backups) survives; failures end that chain silently.
fn prune_empty_dirs(dirs: &[PathBuf], home: &Path) {
    for dir in dirs {
        let mut current = dir.as_path();
        while current != home && current.starts_with(home) {
            if std::fs::remove_dir(current).is_err() {
                break;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
}

/// Delete the state store itself; the final uninstall step.
pub struct ClearLedger;

impl Task for ClearLedger {
    fn name(&self) -> &str {
        "clear state"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.mode.is_preview() {
            ctx.log
                .dry_run(&format!("would delete {}", ctx.ledger.path().display()));
            return Ok(TaskResult::DryRun);
        }
        ctx.ledger.clear()?;
        Ok(TaskResult::Ok)
    }
}
