//! Error types for FluidBG.
//!
//! This module provides the unified error type returned to the command line
//! surface. Internal layers keep their own error enums (configuration I/O,
//! wallpaper setter, remote fetch) and are folded into [`FluidError`] at the
//! boundary.

use thiserror::Error;

/// Errors that can surface to the user.
///
/// Everything the rotation core does internally degrades to defaults or a
/// no-op tick; the variants here are the few conditions a caller is told
/// about synchronously.
#[derive(Debug, Error)]
pub enum FluidError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// The requested interval exceeds the timer's upper bound.
    #[error("Interval must be less than 4 weeks (requested {requested_seconds} seconds)")]
    IntervalTooLong {
        /// The rejected interval, in seconds.
        requested_seconds: f64,
    },
    /// A history entry or source entry was not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Wallpaper operation failed.
    #[error("Wallpaper error: {0}")]
    WallpaperError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for FluidError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<crate::wallpaper::WallpaperError> for FluidError {
    fn from(err: crate::wallpaper::WallpaperError) -> Self { Self::WallpaperError(err.to_string()) }
}

impl From<serde_json::Error> for FluidError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<String> for FluidError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for FluidError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = FluidError::InvalidArguments("Unknown unit 'fortnights'".to_string());
        assert_eq!(err.to_string(), "Unknown unit 'fortnights'");
    }

    #[test]
    fn test_interval_too_long_display() {
        let err = FluidError::IntervalTooLong { requested_seconds: 2_419_200.0 };
        let msg = err.to_string();
        assert!(msg.contains("less than 4 weeks"));
        assert!(msg.contains("2419200"));
    }

    #[test]
    fn test_not_found_display() {
        let err = FluidError::NotFound("history entry 3".to_string());
        assert_eq!(err.to_string(), "Not found: history entry 3");
    }

    #[test]
    fn test_wallpaper_error_display() {
        let err = FluidError::WallpaperError("Image not found".to_string());
        assert!(err.to_string().contains("Wallpaper error"));
    }

    #[test]
    fn test_config_error_display() {
        let err = FluidError::ConfigError("Invalid JSON".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: FluidError = io_err.into();
        assert!(matches!(err, FluidError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_from_string() {
        let err: FluidError = "test error".into();
        assert!(matches!(err, FluidError::CommandError(_)));
        assert_eq!(err.to_string(), "test error");
    }
}
