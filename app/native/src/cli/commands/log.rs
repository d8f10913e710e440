//! Activity log CLI commands.

use clap::Subcommand;

use super::Context;
use crate::error::FluidError;

/// Activity log subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum LogCommands {
    /// Print the activity log.
    Show,

    /// Show the path to the activity log.
    Path,

    /// Empty the activity log.
    Clear,
}

/// Execute log subcommands.
///
/// # Errors
///
/// Returns an error if the log cannot be truncated.
pub fn execute(ctx: &Context, cmd: &LogCommands) -> Result<(), FluidError> {
    let log = ctx.activity_log();

    match cmd {
        LogCommands::Show => print!("{}", log.read()),
        LogCommands::Path => println!("{}", log.path().display()),
        LogCommands::Clear => {
            log.clear()?;
            println!("Activity log cleared");
        }
    }
    Ok(())
}
