//! Remote "daily image" source.
//!
//! Only the collaborator interface ships here. Fetches run on a helper thread
//! and are abandoned after a timeout so a hung download cannot stall the
//! scheduler.

use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::platform::thread::spawn_named_thread;

/// A downloaded remote image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    /// Local file the image was saved to.
    pub path: PathBuf,
    /// Human-readable credit shown in the history.
    pub attribution: String,
}

/// Errors that can occur when fetching the remote image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No remote source is available in this build.
    #[error("No remote image source is configured")]
    NotConfigured,
    /// The fetch failed.
    #[error("Remote image fetch failed: {0}")]
    Failed(String),
    /// The fetch did not finish in time.
    #[error("Remote image fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Provides the remote daily image.
pub trait RemoteImageSource: Send + Sync {
    /// Downloads the current image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image could not be retrieved.
    fn fetch(&self) -> Result<RemoteImage, RemoteError>;
}

/// A remote source that always reports [`RemoteError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteSource;

impl RemoteImageSource for NoRemoteSource {
    fn fetch(&self) -> Result<RemoteImage, RemoteError> { Err(RemoteError::NotConfigured) }
}

/// Runs `source.fetch()` on a helper thread and waits at most `timeout`.
///
/// # Errors
///
/// Returns the fetch error, [`RemoteError::Timeout`] if the fetch is still
/// running when the timeout expires, or [`RemoteError::Failed`] if the
/// helper thread could not run it.
pub fn fetch_with_timeout(
    source: &Arc<dyn RemoteImageSource>,
    timeout: Duration,
) -> Result<RemoteImage, RemoteError> {
    let (tx, rx) = mpsc::channel();
    let source = Arc::clone(source);

    spawn_named_thread("remote-fetch", move || {
        // The receiver is gone once the caller has timed out.
        let _ = tx.send(source.fetch());
    })
    .ok_or_else(|| RemoteError::Failed("could not start fetch thread".to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(RemoteError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(RemoteError::Failed("fetch thread exited without a result".to_string()))
        }
    }
}
