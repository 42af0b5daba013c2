//! Package layer: batched pacman and paru installs, gated removal.
use anyhow::Result;

use crate::ledger::Category;
use crate::logging::Log as _;
use crate::resources::package::{self, PackageManager};

use super::{Context, Task, TaskResult, TaskStats};

/// Record installed packages in the ledger, warning on write failure.
fn record_packages(ctx: &Context, names: &[&str]) {
    for name in names {
        if let Err(e) = ctx.ledger.add(Category::Package, name) {
            ctx.log.warn(&format!("could not record package {name}: {e:#}"));
        }
    }
}

/// Install the missing subset of `declared` through `manager`.
///
/// Only the packages this run actually installs are recorded in the ledger;
/// anything already present stays unrecorded so uninstall can never remove a
/// package the user installed themselves.
fn install_declared(
    ctx: &Context,
    manager: PackageManager,
    declared: &[String],
) -> Result<TaskResult> {
    let installed = package::installed_packages(ctx.executor.as_ref())?;
    let missing: Vec<&str> = declared
        .iter()
        .filter(|name| !installed.contains(name.as_str()))
        .map(String::as_str)
        .collect();

    let mut stats = TaskStats::default();
    stats.already_ok = declared.len() - missing.len();

    if missing.is_empty() {
        ctx.log.debug("all packages present");
        return Ok(stats.finish(ctx));
    }

    if ctx.mode.is_preview() {
        ctx.log
            .dry_run(&format!("would install: {}", missing.join(" ")));
        stats.changed = missing.len();
        return Ok(stats.finish(ctx));
    }

    package::install(ctx.executor.as_ref(), manager, &missing)?;
    stats.changed = missing.len();
    record_packages(ctx, &missing);
    Ok(stats.finish(ctx))
}

/// Install the declared official-repository packages.
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &str {
        "install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.packages.is_empty() && ctx.executor.which("pacman")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_declared(ctx, PackageManager::Pacman, &ctx.config.packages.packages)
    }
}

/// Install the declared AUR packages; not applicable without paru.
pub struct InstallAurPackages;

impl Task for InstallAurPackages {
    fn name(&self) -> &str {
        "install aur packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.aur.is_empty() && ctx.executor.which("paru")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_declared(ctx, PackageManager::Paru, &ctx.config.packages.aur)
    }
}

/// Remove every ledger-recorded package in one confirmed, batched call.
pub struct RemovePackages;

impl Task for RemovePackages {
    fn name(&self) -> &str {
        "remove packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.ledger.list(Category::Package).is_empty() && ctx.executor.which("pacman")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let names = ctx.ledger.list(Category::Package);

        if ctx.mode.is_preview() {
            ctx.log
                .dry_run(&format!("would remove: {}", names.join(" ")));
            return Ok(TaskResult::DryRun);
        }

        if !ctx.assume_yes && !confirm_removal(names.len()) {
            return Ok(TaskResult::Skipped("package removal declined".to_string()));
        }

        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        if !package::remove(ctx.executor.as_ref(), &name_refs)? {
            ctx.log
                .warn("pacman -Rns failed; package entries kept in the ledger");
            return Ok(TaskResult::Skipped("package removal failed".to_string()));
        }

        for name in &names {
            if let Err(e) = ctx.ledger.remove_entry(Category::Package, name) {
                ctx.log.warn(&format!("could not drop entry {name}: {e:#}"));
            }
        }
        ctx.log.info(&format!("removed {} packages", names.len()));
        Ok(TaskResult::Ok)
    }
}

/// Default-no prompt; any prompt failure (no TTY) counts as "no".
fn confirm_removal(count: usize) -> bool {
    inquire::Confirm::new(&format!("Remove {count} packages installed by niri-setup?"))
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}
