//! The rotation controller.
//!
//! [`Rotator`] wires one configuration store, one rotation engine and one
//! interval scheduler together. Outer surfaces (the CLI and the daemon loop)
//! talk to it instead of to the parts: it persists a change and then brings
//! the scheduler in line with it.

use std::path::Path;
use std::sync::Arc;

use crate::config::{ConfigKey, ConfigStore, FluidConfig, IntervalUnit, WallpaperMode};
use crate::error::FluidError;
use crate::scheduler::{Clock, IntervalScheduler, NEVER, SystemClock};
use crate::wallpaper::{HistoryEntry, OsWallpaperSetter, RotationEngine, TickOutcome};

/// Drives wallpaper rotation from the persisted configuration.
pub struct Rotator {
    config: Arc<ConfigStore>,
    engine: Arc<RotationEngine>,
    scheduler: Arc<IntervalScheduler>,
}

impl Rotator {
    /// Creates a rotator around `engine`, reading the same store the engine reads.
    ///
    /// The scheduler is created stopped; call [`apply_config`](Self::apply_config)
    /// to start it when the configuration says so.
    #[must_use]
    pub fn new(engine: RotationEngine, clock: Arc<dyn Clock>) -> Self {
        let config = Arc::clone(engine.config());
        let engine = Arc::new(engine);
        let interval = bounded_interval(&config.snapshot()).unwrap_or(0.0);
        let scheduler = Arc::new(IntervalScheduler::new(interval, clock));

        let tick_engine = Arc::clone(&engine);
        let tick_scheduler = Arc::downgrade(&scheduler);
        scheduler.set_callback(move || {
            let outcome = tick_engine.on_tick();
            let next = tick_scheduler
                .upgrade()
                .map_or_else(|| NEVER.to_string(), |scheduler| scheduler.next_tick_timestamp());
            log_tick(&outcome, &next);
        });

        Self { config, engine, scheduler }
    }

    /// Creates a rotator for the data directory `dir`, painting through the OS.
    #[must_use]
    pub fn open(dir: &Path) -> Self {
        let config = Arc::new(ConfigStore::in_dir(dir));
        config.validate();
        let engine = RotationEngine::new(config, Arc::new(OsWallpaperSetter));
        Self::new(engine, Arc::new(SystemClock))
    }

    /// Brings the scheduler in line with the stored configuration.
    ///
    /// A changed interval re-arms a running timer; an unchanged one leaves it
    /// alone. An interval past the timer bound is logged and ignored, keeping
    /// the current period. `enabled` starts or stops the timer.
    pub fn apply_config(&self) {
        let config = self.config.snapshot();

        if let Some(interval) = bounded_interval(&config)
            && (self.scheduler.interval_seconds() - interval).abs() > f64::EPSILON
        {
            tracing::info!(interval_seconds = interval, "rotation interval changed");
            self.scheduler.change_interval(interval);
        }

        match (config.enabled, self.scheduler.is_running()) {
            (true, false) => {
                self.scheduler.start();
                tracing::info!(next = %self.scheduler.next_tick_timestamp(), "rotation enabled");
            }
            (false, true) => {
                self.scheduler.stop();
                tracing::info!("rotation disabled");
            }
            _ => {}
        }
    }

    /// Stores a new interval and re-arms the timer with it.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::IntervalTooLong`] or [`FluidError::InvalidArguments`]
    /// if the interval is rejected; the stored interval is then unchanged.
    pub fn set_interval(&self, multiplier: f64, unit: IntervalUnit) -> Result<f64, FluidError> {
        let seconds = self.config.set_interval(multiplier, unit)?;
        self.scheduler.change_interval(seconds);
        tracing::info!(interval = multiplier, unit = %unit, "rotation interval set");
        Ok(seconds)
    }

    /// Stores `enabled` and starts or stops the timer.
    pub fn set_enabled(&self, enabled: bool) {
        self.config.set(ConfigKey::Enabled, enabled);
        self.apply_config();
    }

    /// Stores the display fit mode.
    pub fn set_mode(&self, mode: WallpaperMode) {
        self.config.set(ConfigKey::WallpaperModeIndex, mode.index());
    }

    /// Stores whether the image is tiled.
    pub fn set_tile(&self, tile: bool) { self.config.set(ConfigKey::TileImage, tile); }

    /// Stores whether the remote daily image takes part in rotation.
    pub fn set_remote_enabled(&self, enabled: bool) { self.config.set_remote_enabled(enabled); }

    /// Adds a source entry. See [`ConfigStore::add_source`].
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist.
    pub fn add_source(&self, entry: &str) -> Result<String, FluidError> {
        self.config.add_source(entry)
    }

    /// Removes the first matching source entry.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::NotFound`] if no entry matched.
    pub fn remove_source(&self, entry: &str) -> Result<(), FluidError> {
        if self.config.remove_source(entry) {
            Ok(())
        } else {
            Err(FluidError::NotFound(format!("Source not configured: {entry}")))
        }
    }

    /// Runs one tick right now. The scheduled timing is not affected.
    pub fn change_now(&self) -> TickOutcome { self.engine.on_tick() }

    /// Re-applies history entry `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or the setter fails.
    pub fn apply_history(&self, index: usize) -> Result<HistoryEntry, FluidError> {
        self.engine.apply_history(index)
    }

    /// Returns the history, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> { self.engine.history() }

    /// Returns the formatted next tick, or `"Never"`.
    #[must_use]
    pub fn next_tick_timestamp(&self) -> String { self.scheduler.next_tick_timestamp() }

    /// Stops the timer without touching the stored configuration.
    pub fn shutdown(&self) { self.scheduler.stop(); }

    /// Returns the configuration store.
    #[must_use]
    pub const fn config(&self) -> &Arc<ConfigStore> { &self.config }

    /// Returns the scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &Arc<IntervalScheduler> { &self.scheduler }

    /// Returns the rotation engine.
    #[must_use]
    pub const fn engine(&self) -> &Arc<RotationEngine> { &self.engine }
}

impl std::fmt::Debug for Rotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rotator")
            .field("config", &self.config.path())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

/// Returns the configured interval, or `None` (logged) if the timer cannot hold it.
fn bounded_interval(config: &FluidConfig) -> Option<f64> {
    config
        .checked_interval_seconds()
        .inspect_err(|err| {
            tracing::warn!(
                interval = config.interval,
                unit = %config.interval_unit(),
                error = %err,
                "ignoring configured interval"
            );
        })
        .ok()
}

fn log_tick(outcome: &TickOutcome, next: &str) {
    match outcome {
        TickOutcome::Applied(entry) => {
            tracing::info!(next = %next, "wallpaper changed to {}", entry.display_text);
        }
        TickOutcome::SetFailed { .. } => tracing::warn!(next = %next, "{outcome}"),
        TickOutcome::NoCandidates
        | TickOutcome::EmptyDirectory(_)
        | TickOutcome::RemoteUnavailable(_) => tracing::debug!(next = %next, "{outcome}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::scheduler::ManualClock;
    use crate::wallpaper::{WallpaperError, WallpaperSetter};

    struct NullSetter;

    impl WallpaperSetter for NullSetter {
        fn set_wallpaper(&self, _: &Path, _: WallpaperMode, _: bool) -> Result<(), WallpaperError> {
            Ok(())
        }
    }

    fn rotator(dir: &TempDir) -> Rotator {
        let config = Arc::new(ConfigStore::in_dir(dir.path()));
        let clock = Arc::new(ManualClock::new(Local.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap()));
        Rotator::new(RotationEngine::new(config, Arc::new(NullSetter)), clock)
    }

    #[test]
    fn test_display_setters_persist() {
        let dir = TempDir::new().unwrap();
        let rotator = rotator(&dir);

        rotator.set_mode(WallpaperMode::Tile);
        rotator.set_tile(true);
        rotator.set_remote_enabled(true);

        let config = ConfigStore::in_dir(dir.path()).snapshot();
        assert_eq!(config.wallpaper_mode(), WallpaperMode::Tile);
        assert!(config.tile_image);
        assert!(config.remote_image_enabled);
    }

    #[test]
    fn test_change_now_does_not_move_next_tick() {
        let dir = TempDir::new().unwrap();
        let rotator = rotator(&dir);
        rotator.set_interval(1.0, IntervalUnit::Hours).unwrap();
        rotator.set_enabled(true);

        rotator.add_source("remote").unwrap();
        rotator.set_remote_enabled(true);
        let outcome = rotator.change_now();

        assert!(matches!(outcome, TickOutcome::RemoteUnavailable(_)));
        assert_eq!(rotator.next_tick_timestamp(), "09:00:00");
        rotator.shutdown();
    }

    #[test]
    fn test_out_of_range_interval_in_file_keeps_current_period() {
        let dir = TempDir::new().unwrap();
        let rotator = rotator(&dir);
        rotator.set_interval(2.0, IntervalUnit::Minutes).unwrap();
        std::fs::write(
            rotator.config().path(),
            r#"{"enabled": true, "intervalIndex": 4, "interval": 1e9}"#,
        )
        .unwrap();

        rotator.apply_config();

        assert!(rotator.scheduler().is_running());
        assert!((rotator.scheduler().interval_seconds() - 120.0).abs() < f64::EPSILON);
        assert_eq!(rotator.next_tick_timestamp(), "08:02:00");
        rotator.shutdown();
    }

    #[test]
    fn test_fresh_rotator_is_stopped() {
        let dir = TempDir::new().unwrap();
        let rotator = rotator(&dir);

        assert!(!rotator.scheduler().is_running());
        assert_eq!(rotator.next_tick_timestamp(), NEVER);
        assert!(rotator.history().is_empty());
    }
}
