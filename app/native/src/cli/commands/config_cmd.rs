//! Config CLI commands.
//!
//! Commands for inspecting the FluidBG configuration file.

use clap::Subcommand;
use serde_json::Value;

use super::Context;
use crate::cli::output::print_highlighted_json;
use crate::config::ConfigKey;
use crate::error::FluidError;

/// Config inspection commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Print the whole configuration, after healing it.
    Show,

    /// Print the value of one key.
    #[command(after_long_help = r#"Keys:
  sourcePaths, intervalIndex, interval, enabled, startHidden,
  wallpaperModeIndex, tileImage, remoteImageEnabled"#)]
    Get {
        /// Key to read (case-insensitive).
        key: ConfigKey,
    },

    /// Show the path to the configuration file.
    Path,

    /// Create the file if needed and backfill missing or mistyped keys.
    Validate,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn execute(ctx: &Context, cmd: &ConfigCommands) -> Result<(), FluidError> {
    match cmd {
        ConfigCommands::Show => {
            let value = serde_json::to_value(ctx.store().snapshot())?;
            print_highlighted_json(&value);
        }
        ConfigCommands::Get { key } => {
            print_highlighted_json(&config_value(ctx, *key));
        }
        ConfigCommands::Path => {
            let store = ctx.store();
            let marker = if store.path().exists() { "" } else { " (not created yet)" };
            println!("{}{marker}", store.path().display());
        }
        ConfigCommands::Validate => {
            let store = ctx.store();
            store.validate();
            println!("Configuration OK: {}", store.path().display());
        }
    }
    Ok(())
}

/// Returns the configured value of `key` as JSON.
#[must_use]
pub fn config_value(ctx: &Context, key: ConfigKey) -> Value { ctx.store().get_value(key) }
