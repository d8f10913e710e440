//! Configuration module for FluidBG.
//!
//! This module provides the configuration schema, the persistent store that
//! enforces it, and a watcher that reports out-of-process edits.
//!
//! The configuration file may contain comments (JSONC) when edited by hand;
//! the store writes it back as plain JSON.

pub mod store;
pub mod types;
mod watcher;

use std::path::PathBuf;

pub use store::ConfigStore;
pub use types::{
    ConfigError, ConfigKey, FluidConfig, IntervalUnit, ValueType, WallpaperMode,
    checked_interval_seconds,
};
pub use watcher::{ConfigWatcher, watch_config_file};

use crate::constants::APP_NAME;

/// Returns the per-user directory holding `config.json` and the activity log.
///
/// Resolves to `<data dir>/fluidbg` (for example `~/.local/share/fluidbg` on
/// Linux or `%APPDATA%\fluidbg` on Windows), falling back to the system
/// temp directory when no data directory is known.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join(APP_NAME)
}
