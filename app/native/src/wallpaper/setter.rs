//! Desktop wallpaper setter.
//!
//! The rotation engine only sees the [`WallpaperSetter`] trait. The default
//! implementation paints through the `wallpaper` crate.

use std::path::Path;

use crate::config::WallpaperMode;

/// Errors that can occur when setting the wallpaper.
#[derive(Debug, thiserror::Error)]
pub enum WallpaperError {
    /// The wallpaper file does not exist.
    #[error("Wallpaper file not found: {0}")]
    FileNotFound(String),
    /// The platform refused to set the wallpaper.
    #[error("Failed to set wallpaper: {0}")]
    SetWallpaperFailed(String),
}

/// Paints an image onto the desktop.
pub trait WallpaperSetter: Send + Sync {
    /// Sets `path` as the desktop background.
    ///
    /// # Errors
    ///
    /// Returns an error if the image could not be applied.
    fn set_wallpaper(&self, path: &Path, mode: WallpaperMode, tile: bool)
    -> Result<(), WallpaperError>;
}

/// Sets the wallpaper through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsWallpaperSetter;

impl WallpaperSetter for OsWallpaperSetter {
    fn set_wallpaper(
        &self,
        path: &Path,
        mode: WallpaperMode,
        tile: bool,
    ) -> Result<(), WallpaperError> {
        if !path.exists() {
            return Err(WallpaperError::FileNotFound(path.display().to_string()));
        }

        // Not every desktop supports fit modes; the image is still applied.
        if let Err(err) = wallpaper::set_mode(os_mode(mode, tile)) {
            tracing::debug!(mode = %mode, tile, error = %err, "failed to set wallpaper mode");
        }

        let path_str = path.display().to_string();
        wallpaper::set_from_path(&path_str)
            .map_err(|err| WallpaperError::SetWallpaperFailed(err.to_string()))
    }
}

fn os_mode(mode: WallpaperMode, tile: bool) -> wallpaper::Mode {
    if tile {
        return wallpaper::Mode::Tile;
    }

    match mode {
        WallpaperMode::Fill => wallpaper::Mode::Crop,
        WallpaperMode::Fit => wallpaper::Mode::Fit,
        WallpaperMode::Stretch => wallpaper::Mode::Stretch,
        WallpaperMode::Center => wallpaper::Mode::Center,
        WallpaperMode::Tile => wallpaper::Mode::Tile,
        WallpaperMode::Span => wallpaper::Mode::Span,
    }
}
