//! Pacman/AUR package primitives.
//!
//! Package state comes from one bulk `pacman -Q` query per run; installs and
//! removals are single batched invocations so the user sees at most one sudo
//! prompt per step.
use std::collections::HashSet;

use anyhow::Result;

use crate::exec::Executor;

/// Which package manager front-end handles a set of packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Official repositories via `sudo pacman`.
    Pacman,
    /// AUR packages via `paru` (which escalates on its own).
    Paru,
}

impl PackageManager {
    /// Binary this manager needs on PATH.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Paru => "paru",
        }
    }
}

/// Names of all installed packages, from a single `pacman -Q`.
///
/// # Errors
///
/// Returns an error if pacman cannot be executed or exits non-zero.
pub fn installed_packages(exec: &dyn Executor) -> Result<HashSet<String>> {
    let result = exec.run("pacman", &["-Q"])?;
    Ok(result
        .stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect())
}

/// Install `names` in one batched, non-interactive invocation.
///
/// `--needed` makes the call a no-op for anything already present, so callers
/// do not have to be exact about the missing set.
///
/// # Errors
///
/// Returns an error if the install command fails.
pub fn install(exec: &dyn Executor, manager: PackageManager, names: &[&str]) -> Result<()> {
    let mut args = vec!["-S", "--needed", "--noconfirm"];
    args.extend_from_slice(names);
    match manager {
        PackageManager::Pacman => {
            let mut sudo_args = vec!["pacman"];
            sudo_args.extend_from_slice(&args);
            exec.run("sudo", &sudo_args)?;
        }
        PackageManager::Paru => {
            exec.run("paru", &args)?;
        }
    }
    Ok(())
}

/// Remove `names` with dependencies in one batched invocation.
///
/// Returns whether the removal succeeded; a non-zero exit is reported to the
/// caller rather than raised, since partial failure (a package already gone,
/// or held by something else) should not abort an uninstall.
///
/// # Errors
///
/// Returns an error only if the command cannot be spawned.
pub fn remove(exec: &dyn Executor, names: &[&str]) -> Result<bool> {
    let mut args = vec!["pacman", "-Rns", "--noconfirm"];
    args.extend_from_slice(names);
    let result = exec.run_unchecked("sudo", &args)?;
    Ok(result.success)
}
