//! Config and script synchronization.
//!
//! Both sync tasks and the verifier build their destination sets through
//! [`expected_config_links`] and [`expected_script_links`], so what gets
//! linked and what gets checked can never drift apart.
use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::ledger::Category;
use crate::logging::Log as _;
use crate::mapper;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

use super::{Context, Task, TaskResult, TaskStats};

/// Expected symlinks for one run, plus the mapping sources that were absent.
#[derive(Debug, Default)]
pub struct LinkSet {
    /// Symlinks that should exist after a sync.
    pub links: Vec<SymlinkResource>,
    /// Mapping sources whose directory is missing (warned, not fatal).
    pub missing_sources: Vec<String>,
}

/// Derive the full set of config symlinks from the mapping table.
///
/// For each mapping entry, every file under `config/<source>/` maps to
/// `<config_home>/<dest>/<relative>` with the relative structure preserved.
///
/// # Errors
///
/// Returns an error if an existing source directory cannot be enumerated.
pub fn expected_config_links(config: &Config, config_home: &Path) -> Result<LinkSet> {
    let mut set = LinkSet::default();
    for mapping in &config.mappings {
        let source_dir = config.config_dir().join(&mapping.source);
        if !source_dir.is_dir() {
            set.missing_sources.push(mapping.source.clone());
            continue;
        }
        let files = mapper::enumerate(&source_dir)?;
        let dest_dir = config_home.join(&mapping.dest);
        for file in files {
            set.links.push(SymlinkResource::new(
                file.source,
                dest_dir.join(&file.relative),
            ));
        }
    }
    Ok(set)
}

/// Derive the script symlinks: `scripts/<name>` to `<bin_dir>/<name>`.
///
/// # Errors
///
/// Returns an error if an existing scripts directory cannot be enumerated.
pub fn expected_script_links(config: &Config, bin_dir: &Path) -> Result<Vec<SymlinkResource>> {
    Ok(mapper::enumerate_flat(&config.scripts_dir())?
        .into_iter()
        .map(|file| SymlinkResource::new(file.source, bin_dir.join(&file.relative)))
        .collect())
}

/// Reconcile one symlink, recording it in the ledger on success.
fn sync_link(ctx: &Context, link: &SymlinkResource, stats: &mut TaskStats) -> Result<()> {
    match link.current_state()? {
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {}: {reason}", link.description()));
            stats.skipped += 1;
        }
        ResourceState::Correct => {
            stats.already_ok += 1;
            if !ctx.mode.is_preview() {
                record_link(ctx, link);
            }
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            if ctx.mode.is_preview() {
                ctx.log.dry_run(&format!("would link {}", link.description()));
            } else {
                link.apply()?;
                ctx.log.debug(&format!("linked {}", link.description()));
                record_link(ctx, link);
            }
            stats.changed += 1;
        }
    }
    Ok(())
}

/// Ledger writes are best-effort; a failure downgrades to a warning.
fn record_link(ctx: &Context, link: &SymlinkResource) {
    let value = link.target.display().to_string();
    if let Err(e) = ctx.ledger.add(Category::File, &value) {
        ctx.log.warn(&format!("could not record {value}: {e:#}"));
    }
}

/// Symlink every mapped config file into `~/.config`.
pub struct SyncConfigs;

impl Task for SyncConfigs {
    fn name(&self) -> &str {
        "sync configs"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let set = expected_config_links(&ctx.config, &ctx.config_home())?;
        let mut stats = TaskStats::default();
        for source in &set.missing_sources {
            ctx.log
                .warn(&format!("source missing: config/{source}, skipping"));
            stats.skipped += 1;
        }
        for link in &set.links {
            sync_link(ctx, link, &mut stats)?;
        }
        Ok(stats.finish(ctx))
    }
}

/// Symlink user scripts into `~/.local/bin`, keeping them executable.
pub struct SyncScripts;

impl Task for SyncScripts {
    fn name(&self) -> &str {
        "sync scripts"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let scripts_dir = ctx.config.scripts_dir();
        if !scripts_dir.is_dir() {
            return Ok(TaskResult::Skipped("scripts directory missing".to_string()));
        }
        let links = expected_script_links(&ctx.config, &ctx.bin_dir())?;
        let mut stats = TaskStats::default();
        for link in &links {
            if !ctx.mode.is_preview() {
                make_executable(&link.source)?;
            }
            sync_link(ctx, link, &mut stats)?;
        }
        Ok(stats.finish(ctx))
    }
}

/// (Re-)apply the executable bit; sources are otherwise never modified.
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    if permissions.mode() & 0o111 != 0o111 {
        permissions.set_mode(permissions.mode() | 0o755);
        std::fs::set_permissions(path, permissions)?;
    }
    Ok(())
}
