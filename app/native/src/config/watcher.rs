//! Configuration file watcher.
//!
//! The CLI edits the configuration file while the daemon runs. The watcher
//! notices those writes and hands them to a callback once the file has been
//! quiet for [`CONFIG_DEBOUNCE_MS`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::constants::timing::CONFIG_DEBOUNCE_MS;
use crate::platform::thread::spawn_named_thread;

/// Handle to a running configuration watcher.
///
/// Dropping the handle stops watching; the background thread exits once the
/// event channel closes.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Returns the watched file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Starts watching `path` and calls `on_change` after each burst of writes.
///
/// The parent directory is watched so editors that save by writing a temp
/// file and renaming it are still noticed. Returns `None` if the watcher
/// could not be created; the failure is logged.
pub fn watch_config_file<F>(path: &Path, on_change: F) -> Option<ConfigWatcher>
where
    F: Fn() + Send + 'static,
{
    let file_name: OsString = path.file_name()?.to_os_string();
    let watch_dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();

    let mut watcher = match notify::recommended_watcher(tx) {
        Ok(watcher) => watcher,
        Err(err) => {
            tracing::warn!(error = %err, "failed to create config watcher");
            return None;
        }
    };

    if let Err(err) = watcher.watch(watch_dir, RecursiveMode::NonRecursive) {
        tracing::warn!(path = %watch_dir.display(), error = %err, "failed to watch config file");
        return None;
    }

    let affects_config = move |event: &notify::Event| {
        event.paths.iter().any(|p| p.file_name().is_some_and(|name| name == file_name))
    };

    spawn_named_thread("config-watcher", move || {
        let debounce = Duration::from_millis(CONFIG_DEBOUNCE_MS);

        loop {
            match rx.recv() {
                Ok(Ok(event)) if affects_config(&event) => {}
                Ok(Ok(_)) => continue,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "config watch error");
                    continue;
                }
                Err(_) => break,
            }

            // Swallow the rest of the burst.
            let closed = loop {
                match rx.recv_timeout(debounce) {
                    Ok(_) => {}
                    Err(RecvTimeoutError::Timeout) => break false,
                    Err(RecvTimeoutError::Disconnected) => break true,
                }
            };

            tracing::debug!("config file changed");
            on_change();

            if closed {
                break;
            }
        }
    })?;

    tracing::debug!(path = %path.display(), "watching config file");
    Some(ConfigWatcher { path: path.to_path_buf(), _watcher: watcher })
}
