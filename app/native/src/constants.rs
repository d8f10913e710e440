//! Application-wide constants.
//!
//! Constants are grouped by functionality:
//! - `files` - Names of the files kept in the data directory
//! - `interval` - Rotation interval units and bounds
//! - `sources` - Source list and candidate resolution
//! - `timing` - Timeouts and debouncing

/// Application name, used for the data directory and thread names.
pub const APP_NAME: &str = "fluidbg";

/// Files kept in the per-user data directory.
pub mod files {
    /// The persisted configuration object.
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// The append-only activity log.
    pub const LOG_FILE_NAME: &str = "log.tmp";
}

/// Rotation interval units and bounds.
pub mod interval {
    /// Seconds per unit, indexed by the `intervalIndex` configuration key.
    ///
    /// Order: seconds, minutes, hours, days, weeks.
    pub const UNIT_SECONDS: [u32; 5] = [1, 60, 3_600, 86_400, 604_800];

    /// Largest accepted interval in milliseconds (`i32::MAX`, a little under 25 days).
    ///
    /// Anything longer overflows a signed 32-bit millisecond timer period.
    pub const MAX_INTERVAL_MS: f64 = 2_147_483_647.0;

    /// The multiplier written when the stored one is missing or invalid.
    pub const DEFAULT_MULTIPLIER: f64 = 1.0;
}

/// Source list and candidate resolution.
pub mod sources {
    /// Source entry that stands for the remote "daily image" collaborator.
    pub const REMOTE_SENTINEL: &str = "remote";

    /// Image extensions picked up when listing a source directory (lowercase).
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

    /// Maximum number of entries kept in the rotation history.
    pub const HISTORY_CAPACITY: usize = 1000;
}

/// Timeouts and debouncing.
pub mod timing {
    /// Upper bound on a single remote image fetch (seconds).
    ///
    /// A fetch that takes longer is treated as a failed fetch and the tick is
    /// abandoned.
    pub const REMOTE_FETCH_TIMEOUT_SECS: u64 = 30;

    /// Quiet period after the last config file event before changes are applied (ms).
    ///
    /// Some editors trigger multiple events per save (write to temp, rename, etc.).
    pub const CONFIG_DEBOUNCE_MS: u64 = 200;
}
