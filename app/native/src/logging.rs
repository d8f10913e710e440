//! Logging for FluidBG.
//!
//! Two sinks hang off one `tracing` registry:
//! - stderr, for whoever runs the CLI
//! - the activity log (`log.tmp` next to the config), one `[HH:MM:SS] message`
//!   line per event, kept across CLI invocations and truncated when the
//!   daemon starts
//!
//! `FLUIDBG_LOG` overrides the filter of both sinks (`EnvFilter` syntax).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::constants::files::LOG_FILE_NAME;
use crate::error::FluidError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FLUIDBG_LOG";

/// The append-only activity log file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    /// Creates a handle for `log.tmp` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self { Self { path: dir.join(LOG_FILE_NAME) } }

    /// Returns the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Truncates the log, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn clear(&self) -> Result<(), FluidError> {
        self.ensure_dir()?;
        File::create(&self.path)?;
        Ok(())
    }

    /// Opens the log for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open_append(&self) -> io::Result<File> {
        self.ensure_dir()?;
        OpenOptions::new().create(true).append(true).open(&self.path)
    }

    /// Returns the current content of the log (empty if it does not exist).
    #[must_use]
    pub fn read(&self) -> String { fs::read_to_string(&self.path).unwrap_or_default() }

    fn ensure_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

/// Timestamps activity log lines as `[HH:MM:SS]` in local time.
#[derive(Debug, Clone, Copy, Default)]
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", Local::now().format("%H:%M:%S"))
    }
}

/// Installs the global subscriber.
///
/// `stderr_level` is the default stderr filter (`"info"` for the daemon,
/// `"warn"` for one-shot commands); the activity log records `info` and up.
/// Calling this twice is harmless: the second call is ignored.
pub fn init(log: Option<&ActivityLog>, stderr_level: &str) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter(stderr_level));

    let file_layer = log.and_then(|log| match log.open_append() {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_timer(ClockTime)
                .with_filter(env_filter("info")),
        ),
        Err(err) => {
            eprintln!("fluidbg: warning: failed to open activity log: {err}");
            None
        }
    });

    let _ = tracing_subscriber::registry().with(stderr_layer).with(file_layer).try_init();
}

/// Routes panics through `tracing` so they land in the activity log.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        tracing::error!(thread = thread.name().unwrap_or("unnamed"), "panic: {info}");
        default_hook(info);
    }));
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}
