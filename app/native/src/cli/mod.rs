//! CLI module for FluidBG.
//!
//! Every command reads and writes the same data directory. `fluidbg run`
//! keeps the rotation going and follows edits made by the other commands
//! through the configuration file watcher.

mod commands;
pub(crate) mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::FluidError;
use crate::logging::{self, ActivityLog};

/// Runs the CLI.
///
/// Parses command-line arguments, sets up logging and executes the
/// appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), FluidError> {
    let cli = Cli::parse();
    let log = ActivityLog::in_dir(&cli.data_dir());

    if cli.is_daemon() {
        log.clear()?;
    }

    logging::init(Some(&log), if cli.is_daemon() { "info" } else { "warn" });
    logging::install_panic_hook();

    cli.execute()
}
