//! Display and remote image CLI commands.

use clap::{Subcommand, ValueEnum};

use super::Context;
use crate::config::{ConfigKey, WallpaperMode};
use crate::error::FluidError;

/// An on/off argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Turn the setting on.
    On,
    /// Turn the setting off.
    Off,
}

impl Switch {
    /// Returns whether the switch is on.
    #[must_use]
    pub const fn is_on(self) -> bool { matches!(self, Self::On) }
}

/// Remote image subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum RemoteCommands {
    /// Add the remote daily image to the rotation.
    Enable,
    /// Remove the remote daily image from the rotation.
    Disable,
}

/// Display fit mode subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ModeCommands {
    /// Set the display fit mode.
    #[command(after_long_help = r#"Modes:
  0  fill     Scale to cover the screen, cropping the overflow
  1  fit      Scale to fit inside the screen
  2  stretch  Stretch to the screen size
  3  center   Center without scaling
  4  tile     Repeat across the screen
  5  span     Span across every monitor"#)]
    Set {
        /// Mode name or index.
        mode: WallpaperMode,
    },

    /// Show the configured display fit mode.
    Show,
}

/// Execute remote image subcommands.
///
/// # Errors
///
/// This function currently always succeeds.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn execute_remote(ctx: &Context, cmd: &RemoteCommands) -> Result<(), FluidError> {
    let enabled = matches!(cmd, RemoteCommands::Enable);
    ctx.store().set_remote_enabled(enabled);

    println!("Remote image {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

/// Execute display fit mode subcommands.
///
/// # Errors
///
/// This function currently always succeeds.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn execute_mode(ctx: &Context, cmd: &ModeCommands) -> Result<(), FluidError> {
    match cmd {
        ModeCommands::Set { mode } => {
            ctx.store().set(ConfigKey::WallpaperModeIndex, mode.index());
            println!("Wallpaper mode set to {mode}");
        }
        ModeCommands::Show => {
            let config = ctx.store().snapshot();
            let tile = if config.tile_image { " (tiled)" } else { "" };
            println!("{}{tile}", config.wallpaper_mode());
        }
    }
    Ok(())
}

/// Turns tiling on or off.
///
/// # Errors
///
/// This function currently always succeeds.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn execute_tile(ctx: &Context, state: Switch) -> Result<(), FluidError> {
    ctx.store().set(ConfigKey::TileImage, state.is_on());
    println!("Tiling {}", if state.is_on() { "on" } else { "off" });
    Ok(())
}
