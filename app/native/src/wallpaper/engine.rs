//! Rotation engine.
//!
//! One tick resolves the configured sources, picks one top-level candidate
//! uniformly at random, narrows a directory pick to one of its images, hands
//! the result to the wallpaper setter and records it in the history.
//!
//! Every top-level entry weighs the same: with `[a.png, folder/]` the single
//! file is picked about half of the time however many images the folder holds.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::history::{HistoryEntry, HistoryLog};
use super::remote::{NoRemoteSource, RemoteError, RemoteImageSource, fetch_with_timeout};
use super::setter::{WallpaperError, WallpaperSetter};
use super::sources::{Candidate, list_images, resolve};
use crate::config::ConfigStore;
use crate::constants::timing::REMOTE_FETCH_TIMEOUT_SECS;
use crate::error::FluidError;
use crate::scheduler::{Clock, SystemClock};

/// Result of one rotation tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// No configured source exists; nothing was attempted.
    NoCandidates,
    /// The picked directory holds no images; the tick was abandoned.
    EmptyDirectory(PathBuf),
    /// The remote image could not be fetched; the tick was abandoned.
    RemoteUnavailable(RemoteError),
    /// The wallpaper was changed.
    Applied(HistoryEntry),
    /// An image was picked but the setter failed. The entry is still recorded.
    SetFailed {
        /// The recorded entry.
        entry: HistoryEntry,
        /// Why the setter failed.
        error: WallpaperError,
    },
}

impl TickOutcome {
    /// Returns the history entry recorded by this tick, if any.
    #[must_use]
    pub const fn entry(&self) -> Option<&HistoryEntry> {
        match self {
            Self::Applied(entry) | Self::SetFailed { entry, .. } => Some(entry),
            Self::NoCandidates | Self::EmptyDirectory(_) | Self::RemoteUnavailable(_) => None,
        }
    }

    /// Returns whether the wallpaper was changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates => f.write_str("No wallpaper sources available"),
            Self::EmptyDirectory(dir) => write!(f, "No images in {}", dir.display()),
            Self::RemoteUnavailable(err) => write!(f, "{err}"),
            Self::Applied(entry) => write!(f, "Wallpaper changed to {}", entry.display_text),
            Self::SetFailed { entry, error } => {
                write!(f, "Could not apply {}: {error}", entry.display_text)
            }
        }
    }
}

/// Picks and applies wallpapers, keeping a bounded history.
pub struct RotationEngine {
    config: Arc<ConfigStore>,
    setter: Arc<dyn WallpaperSetter>,
    remote: Arc<dyn RemoteImageSource>,
    history: RwLock<HistoryLog>,
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
    remote_timeout: Duration,
    tick_lock: Mutex<()>,
}

impl RotationEngine {
    /// Creates an engine reading `config` and painting through `setter`.
    ///
    /// No remote source is attached and the system clock is used.
    #[must_use]
    pub fn new(config: Arc<ConfigStore>, setter: Arc<dyn WallpaperSetter>) -> Self {
        Self {
            config,
            setter,
            remote: Arc::new(NoRemoteSource),
            history: RwLock::new(HistoryLog::new()),
            rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
            clock: Arc::new(SystemClock),
            remote_timeout: Duration::from_secs(REMOTE_FETCH_TIMEOUT_SECS),
            tick_lock: Mutex::new(()),
        }
    }

    /// Attaches the remote daily image source.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteImageSource>) -> Self {
        self.remote = remote;
        self
    }

    /// Replaces the random number generator.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Replaces the clock used for history timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the remote fetch timeout.
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Runs one rotation tick.
    ///
    /// Ticks are serialized; a manual tick waits for a scheduled one.
    pub fn on_tick(&self) -> TickOutcome {
        let _tick = self.tick_lock.lock();
        let config = self.config.snapshot();

        let candidates = resolve(&config.source_paths, config.remote_image_enabled);
        if candidates.is_empty() {
            tracing::info!("no wallpaper sources available, skipping tick");
            return TickOutcome::NoCandidates;
        }

        let picked = self.pick(&candidates);
        let (display_text, path) = match picked {
            Candidate::File(path) => (path.display().to_string(), path.clone()),
            Candidate::Directory(dir) => {
                let images = list_images(dir);
                if images.is_empty() {
                    tracing::info!(directory = %dir.display(), "picked directory has no images");
                    return TickOutcome::EmptyDirectory(dir.clone());
                }
                let path = self.pick(&images).clone();
                (path.display().to_string(), path)
            }
            Candidate::Remote => match fetch_with_timeout(&self.remote, self.remote_timeout) {
                Ok(image) => (image.attribution, image.path),
                Err(err) => {
                    tracing::info!(error = %err, "remote image unavailable, skipping tick");
                    return TickOutcome::RemoteUnavailable(err);
                }
            },
        };

        let entry = HistoryEntry::new(display_text, &path, self.clock.now());
        let result = self.setter.set_wallpaper(&path, config.wallpaper_mode(), config.tile_image);
        self.history.write().record(entry.clone());

        match result {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    mode = %config.wallpaper_mode(),
                    "wallpaper changed"
                );
                TickOutcome::Applied(entry)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "failed to set wallpaper");
                TickOutcome::SetFailed { entry, error }
            }
        }
    }

    /// Re-applies the image of history entry `index` (0 is the newest).
    ///
    /// The history itself is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::NotFound`] for an index past the end of the
    /// history, or [`FluidError::WallpaperError`] if the setter fails.
    pub fn apply_history(&self, index: usize) -> Result<HistoryEntry, FluidError> {
        let _tick = self.tick_lock.lock();
        let entry = self
            .history
            .read()
            .get(index)
            .cloned()
            .ok_or_else(|| FluidError::NotFound(format!("history entry {index}")))?;

        let config = self.config.snapshot();
        self.setter.set_wallpaper(&entry.path, config.wallpaper_mode(), config.tile_image)?;

        tracing::info!(path = %entry.path.display(), "wallpaper restored from history");
        Ok(entry)
    }

    /// Returns a snapshot of the history, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> { self.history.read().entries() }

    /// Returns the number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize { self.history.read().len() }

    /// Returns the configuration store the engine reads.
    #[must_use]
    pub const fn config(&self) -> &Arc<ConfigStore> { &self.config }

    fn pick<'a, T>(&self, items: &'a [T]) -> &'a T {
        let index = self.rng.lock().random_range(0..items.len());
        &items[index]
    }
}

impl fmt::Debug for RotationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationEngine")
            .field("config", &self.config.path())
            .field("history_len", &self.history_len())
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}
