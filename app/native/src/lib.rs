//! FluidBG - rotates the desktop wallpaper on an interval.
//!
//! The library is split into the parts the `fluidbg` binary wires together:
//! - [`config`] - Self-healing JSON configuration store and file watcher
//! - [`scheduler`] - Restartable interval timer with a reportable next tick
//! - [`wallpaper`] - Source resolution, random selection, application and history
//! - [`app`] - The controller that keeps the timer in line with the configuration
//! - [`cli`] - Command-line surface and the foreground daemon

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;
pub mod scheduler;
pub mod schema;
pub mod wallpaper;
