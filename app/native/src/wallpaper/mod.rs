//! Wallpaper selection and application.
//!
//! - [`sources`] - Resolves configured entries into selection candidates
//! - [`engine`] - Picks one image per tick and applies it
//! - [`history`] - Bounded newest-first record of applied images
//! - [`setter`] - Paints an image onto the desktop
//! - [`remote`] - Remote daily image interface

pub mod engine;
pub mod history;
pub mod remote;
pub mod setter;
pub mod sources;

pub use engine::{RotationEngine, TickOutcome};
pub use history::{HistoryEntry, HistoryLog};
pub use remote::{NoRemoteSource, RemoteError, RemoteImage, RemoteImageSource};
pub use setter::{OsWallpaperSetter, WallpaperError, WallpaperSetter};
pub use sources::{Candidate, SourceKind};
