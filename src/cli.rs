//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Idempotent provisioning for an Arch Linux niri desktop.
#[derive(Debug, Parser)]
#[command(name = "niri-setup", version, about)]
pub struct Cli {
    /// Global options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOpts {
    /// Enable debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without applying them.
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Source repository root (defaults to $NIRI_SETUP_ROOT, then the
    /// current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install packages, sync configuration symlinks, configure the profile.
    Install,
    /// Pull the source repository, then run the install flow.
    Update,
    /// Preview the install flow without changing anything.
    DryRun,
    /// Remove everything recorded in the state ledger.
    Uninstall {
        /// Skip the package-removal confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Check that the deployed state matches the source tree.
    Verify,
}
