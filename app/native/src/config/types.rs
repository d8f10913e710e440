//! Configuration types for FluidBG.
//!
//! The configuration file is a single JSON object. Every key has a declared
//! type and a default; [`ConfigKey`] is the schema the store validates
//! against, and [`FluidConfig`] is the typed view of a validated object.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::interval::{DEFAULT_MULTIPLIER, MAX_INTERVAL_MS, UNIT_SECONDS};
use crate::error::FluidError;

/// Declared type of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// An ordered list of strings.
    StringList,
    /// A signed integer.
    Integer,
    /// A decimal number.
    Decimal,
    /// A boolean.
    Boolean,
}

impl ValueType {
    /// Returns whether a stored JSON value can be read as this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::StringList => {
                value.as_array().is_some_and(|items| items.iter().all(Value::is_string))
            }
            Self::Integer => value.as_i64().is_some(),
            Self::Decimal => value.as_f64().is_some_and(f64::is_finite),
            Self::Boolean => value.is_boolean(),
        }
    }

    /// Returns the zero value written when a key of this type is backfilled.
    #[must_use]
    pub fn zero_value(self) -> Value {
        match self {
            Self::StringList => Value::Array(Vec::new()),
            Self::Integer => Value::from(0),
            Self::Decimal => Value::from(0.0),
            Self::Boolean => Value::Bool(false),
        }
    }
}

/// Keys of the persisted configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Files, directories and the remote sentinel to pick wallpapers from.
    SourcePaths,
    /// Index into the interval unit table.
    IntervalIndex,
    /// Multiplier applied to the interval unit.
    Interval,
    /// Whether the rotation timer runs.
    Enabled,
    /// Whether the user interface starts hidden.
    StartHidden,
    /// Display fit mode index.
    WallpaperModeIndex,
    /// Whether the image is tiled.
    TileImage,
    /// Whether the remote daily image takes part in rotation.
    RemoteImageEnabled,
}

impl ConfigKey {
    /// Every key of the schema, in file order.
    pub const ALL: [Self; 8] = [
        Self::SourcePaths,
        Self::IntervalIndex,
        Self::Interval,
        Self::Enabled,
        Self::StartHidden,
        Self::WallpaperModeIndex,
        Self::TileImage,
        Self::RemoteImageEnabled,
    ];

    /// Returns the property name used in the JSON file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourcePaths => "sourcePaths",
            Self::IntervalIndex => "intervalIndex",
            Self::Interval => "interval",
            Self::Enabled => "enabled",
            Self::StartHidden => "startHidden",
            Self::WallpaperModeIndex => "wallpaperModeIndex",
            Self::TileImage => "tileImage",
            Self::RemoteImageEnabled => "remoteImageEnabled",
        }
    }

    /// Returns the declared type of the key.
    #[must_use]
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::SourcePaths => ValueType::StringList,
            Self::IntervalIndex | Self::WallpaperModeIndex => ValueType::Integer,
            Self::Interval => ValueType::Decimal,
            Self::Enabled | Self::StartHidden | Self::TileImage | Self::RemoteImageEnabled => {
                ValueType::Boolean
            }
        }
    }

    /// Returns whether `value` may be stored under this key.
    ///
    /// On top of the declared type, `interval` must not be negative.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Interval => {
                self.value_type().accepts(value) && value.as_f64().is_some_and(|v| v >= 0.0)
            }
            other => other.value_type().accepts(value),
        }
    }

    /// Returns the value written when the key is missing or mistyped.
    ///
    /// This is the type's zero value, except for `interval`: a zero multiplier
    /// would make the effective interval zero, so it backfills to one.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Interval => Value::from(DEFAULT_MULTIPLIER),
            other => other.value_type().zero_value(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|key| key.as_str().eq_ignore_ascii_case(s)).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|key| key.as_str()).collect();
            format!("Unknown configuration key '{s}'. Expected one of: {}", known.join(", "))
        })
    }
}

/// Unit the interval multiplier is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntervalUnit {
    /// One second.
    #[default]
    Seconds,
    /// Sixty seconds.
    Minutes,
    /// One hour.
    Hours,
    /// One day.
    Days,
    /// One week.
    Weeks,
}

impl IntervalUnit {
    /// Every unit, in table order.
    pub const ALL: [Self; 5] = [Self::Seconds, Self::Minutes, Self::Hours, Self::Days, Self::Weeks];

    /// Returns the unit stored at `index`, if the index is inside the table.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|index| Self::ALL.get(index).copied())
    }

    /// Returns the table index of the unit.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Seconds => 0,
            Self::Minutes => 1,
            Self::Hours => 2,
            Self::Days => 3,
            Self::Weeks => 4,
        }
    }

    /// Returns the length of the unit in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 { UNIT_SECONDS[self.index()] }

    /// Returns the plural name of the unit.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for IntervalUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<i64>() {
            return Self::from_index(index).ok_or_else(|| {
                format!("Invalid unit index {index}. Expected 0-{}.", Self::ALL.len() - 1)
            });
        }

        match s.to_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Ok(Self::Seconds),
            "m" | "min" | "minute" | "minutes" => Ok(Self::Minutes),
            "h" | "hour" | "hours" => Ok(Self::Hours),
            "d" | "day" | "days" => Ok(Self::Days),
            "w" | "week" | "weeks" => Ok(Self::Weeks),
            _ => Err(format!(
                "Invalid unit '{s}'. Expected 'seconds', 'minutes', 'hours', 'days' or 'weeks'."
            )),
        }
    }
}

/// How the image is fitted to the screen.
///
/// The index order matches the `wallpaperModeIndex` configuration key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperMode {
    /// Scale to cover the screen, cropping the overflow.
    #[default]
    Fill,
    /// Scale to fit inside the screen.
    Fit,
    /// Stretch to the screen size.
    Stretch,
    /// Center without scaling.
    Center,
    /// Repeat the image across the screen.
    Tile,
    /// Span across all screens.
    Span,
}

impl WallpaperMode {
    /// Every mode, in index order.
    pub const ALL: [Self; 6] =
        [Self::Fill, Self::Fit, Self::Stretch, Self::Center, Self::Tile, Self::Span];

    /// Returns the mode stored at `index`, falling back to [`WallpaperMode::Fill`].
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or_default()
    }

    /// Returns the index stored in the configuration.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Fill => 0,
            Self::Fit => 1,
            Self::Stretch => 2,
            Self::Center => 3,
            Self::Tile => 4,
            Self::Span => 5,
        }
    }

    /// Returns the Windows `WallpaperStyle` registry value for this mode.
    #[must_use]
    pub const fn windows_style(self) -> u32 {
        match self {
            Self::Fill => 10,
            Self::Fit => 6,
            Self::Stretch => 2,
            Self::Center | Self::Tile => 0,
            Self::Span => 22,
        }
    }

    /// Returns the lowercase name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Stretch => "stretch",
            Self::Center => "center",
            Self::Tile => "tile",
            Self::Span => "span",
        }
    }
}

impl fmt::Display for WallpaperMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for WallpaperMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<usize>() {
            return Self::ALL.get(index).copied().ok_or_else(|| {
                format!("Invalid mode index {index}. Expected 0-{}.", Self::ALL.len() - 1)
            });
        }

        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s) || (s.eq_ignore_ascii_case("crop") && *mode == Self::Fill))
            .ok_or_else(|| {
                format!(
                    "Invalid mode '{s}'. Expected fill, fit, stretch, center, tile, span or an index."
                )
            })
    }
}

/// Typed view of a validated configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FluidConfig {
    /// Files, directories and the `remote` sentinel to pick wallpapers from.
    ///
    /// Each entry is one selection slot: a directory with many images is as
    /// likely to be picked as a single file.
    pub source_paths: Vec<String>,

    /// Interval unit: 0 = seconds, 1 = minutes, 2 = hours, 3 = days, 4 = weeks.
    pub interval_index: i64,

    /// Multiplier applied to the interval unit.
    pub interval: f64,

    /// Whether the wallpaper rotates on the interval.
    pub enabled: bool,

    /// Whether the user interface starts hidden.
    pub start_hidden: bool,

    /// Display fit mode: 0 = fill, 1 = fit, 2 = stretch, 3 = center, 4 = tile, 5 = span.
    pub wallpaper_mode_index: i64,

    /// Whether the image is tiled across the screen.
    pub tile_image: bool,

    /// Whether the remote daily image takes part in rotation.
    pub remote_image_enabled: bool,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            source_paths: Vec::new(),
            interval_index: 0,
            interval: DEFAULT_MULTIPLIER,
            enabled: false,
            start_hidden: false,
            wallpaper_mode_index: 0,
            tile_image: false,
            remote_image_enabled: false,
        }
    }
}

impl FluidConfig {
    /// Returns the configured interval unit, treating out-of-table indices as seconds.
    #[must_use]
    pub fn interval_unit(&self) -> IntervalUnit {
        IntervalUnit::from_index(self.interval_index).unwrap_or_default()
    }

    /// Returns the effective tick interval in seconds (`unit * interval`).
    ///
    /// Negative multipliers count as zero.
    #[must_use]
    pub fn effective_interval_seconds(&self) -> f64 {
        f64::from(self.interval_unit().seconds()) * self.interval.max(0.0)
    }

    /// Returns the effective interval if the timer can hold it.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`checked_interval_seconds`].
    pub fn checked_interval_seconds(&self) -> Result<f64, FluidError> {
        checked_interval_seconds(self.interval, self.interval_unit())
    }

    /// Returns the configured display fit mode.
    #[must_use]
    pub fn wallpaper_mode(&self) -> WallpaperMode {
        WallpaperMode::from_index(self.wallpaper_mode_index)
    }
}

/// Computes the interval for `multiplier` units, rejecting values the timer cannot hold.
///
/// # Errors
///
/// Returns [`FluidError::InvalidArguments`] for negative or non-finite
/// multipliers and [`FluidError::IntervalTooLong`] when the interval in
/// milliseconds exceeds `i32::MAX`.
pub fn checked_interval_seconds(multiplier: f64, unit: IntervalUnit) -> Result<f64, FluidError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(FluidError::InvalidArguments(format!(
            "Interval must be a non-negative number, got {multiplier}"
        )));
    }

    let seconds = multiplier * f64::from(unit.seconds());
    if seconds * 1000.0 > MAX_INTERVAL_MS {
        return Err(FluidError::IntervalTooLong { requested_seconds: seconds });
    }

    Ok(seconds)
}

/// Errors that can occur when reading or writing the configuration file.
///
/// The store never hands these to its callers; they are logged and the store
/// falls back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("Failed to access configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The configuration file is valid JSON but not a single object.
    #[error("Configuration file is not a JSON object")]
    NotAnObject,
}
