use clap::Parser as _;

use niri_setup::cli::{Cli, Command};
use niri_setup::commands;
use niri_setup::logging;
use niri_setup::tasks::Mode;

fn main() {
    let cli = Cli::parse();
    logging::init_subscriber(cli.global.verbose);

    let mode = if cli.global.dry_run || matches!(cli.command, Command::DryRun) {
        Mode::Preview
    } else {
        Mode::Apply
    };

    let result = match cli.command {
        Command::Install | Command::DryRun => commands::install::run(&cli.global, mode),
        Command::Update => commands::update::run(&cli.global, mode),
        Command::Uninstall { yes } => commands::uninstall::run(&cli.global, mode, yes),
        Command::Verify => commands::verify::run(&cli.global),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
