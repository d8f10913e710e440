//! Interval CLI commands.

use clap::Subcommand;

use super::Context;
use crate::config::{ConfigKey, IntervalUnit};
use crate::error::FluidError;

/// Interval subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum IntervalCommands {
    /// Set the rotation interval.
    ///
    /// The interval is `value` units long. Intervals longer than about 24.8
    /// days are rejected and leave the configuration unchanged.
    #[command(after_long_help = r#"Examples:
  fluidbg interval set 30                # 30 units of the configured unit
  fluidbg interval set 2.5 --unit hours  # Two and a half hours
  fluidbg interval set 1 -u d            # One day"#)]
    Set {
        /// Number of units between changes.
        value: f64,

        /// Unit of the value: seconds, minutes, hours, days or weeks (or 0-4).
        /// Keeps the configured unit if omitted.
        #[arg(long, short)]
        unit: Option<IntervalUnit>,
    },

    /// Show the configured interval.
    Show,
}

/// Execute interval subcommands.
///
/// # Errors
///
/// Returns an error if the interval is out of range.
pub fn execute(ctx: &Context, cmd: &IntervalCommands) -> Result<(), FluidError> {
    match cmd {
        IntervalCommands::Set { value, unit } => set_interval(ctx, *value, *unit),
        IntervalCommands::Show => show_interval(ctx),
    }
}

fn set_interval(ctx: &Context, value: f64, unit: Option<IntervalUnit>) -> Result<(), FluidError> {
    let store = ctx.store();
    let unit = unit.unwrap_or_else(|| store.snapshot().interval_unit());
    let seconds = store.set_interval(value, unit)?;

    println!("Interval set to {value} {unit} ({seconds} seconds)");
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
fn show_interval(ctx: &Context) -> Result<(), FluidError> {
    let config = ctx.store().snapshot();

    println!("{} {}", config.interval, config.interval_unit());
    println!("{} seconds", config.effective_interval_seconds());
    println!("{}: {}", ConfigKey::Enabled, config.enabled);
    Ok(())
}
