//! Source pool resolution.
//!
//! Turns the configured `sourcePaths` into selection candidates. Directories
//! are kept as a single candidate and only listed when picked, so images
//! added to a folder between ticks are seen without touching the config.

use std::fs;
use std::path::{Path, PathBuf};

use natord::compare;
use serde::Serialize;

use crate::constants::sources::{IMAGE_EXTENSIONS, REMOTE_SENTINEL};
use crate::platform::path::expand;

/// One selection slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A single image file.
    File(PathBuf),
    /// A directory, listed when picked.
    Directory(PathBuf),
    /// The remote daily image.
    Remote,
}

/// What a configured source entry currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An existing file.
    File,
    /// An existing directory.
    Directory,
    /// The remote sentinel.
    Remote,
    /// Nothing exists at the path.
    Missing,
}

impl SourceKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Remote => "remote",
            Self::Missing => "missing",
        }
    }
}

/// Classifies a configured entry.
#[must_use]
pub fn classify(entry: &str) -> SourceKind {
    if is_remote_sentinel(entry) {
        return SourceKind::Remote;
    }

    let path = expand(entry);
    if path.as_os_str().is_empty() {
        SourceKind::Missing
    } else if path.is_dir() {
        SourceKind::Directory
    } else if path.is_file() {
        SourceKind::File
    } else {
        SourceKind::Missing
    }
}

/// Resolves configured entries into candidates, in configuration order.
///
/// Entries that do not exist are dropped. A literal `remote` entry counts as
/// `remote_enabled`; either way at most one [`Candidate::Remote`] is appended.
#[must_use]
pub fn resolve<S: AsRef<str>>(entries: &[S], remote_enabled: bool) -> Vec<Candidate> {
    let remote_listed = entries.iter().any(|entry| is_remote_sentinel(entry.as_ref()));
    let mut candidates: Vec<Candidate> = entries
        .iter()
        .map(|entry| entry.as_ref())
        .filter(|entry| !is_remote_sentinel(entry))
        .filter_map(|entry| {
            let path = expand(entry);
            match classify(entry) {
                SourceKind::File => Some(Candidate::File(path)),
                SourceKind::Directory => Some(Candidate::Directory(path)),
                SourceKind::Remote | SourceKind::Missing => {
                    tracing::debug!(source = entry, "skipping unreachable source");
                    None
                }
            }
        })
        .collect();

    if remote_enabled || remote_listed {
        candidates.push(Candidate::Remote);
    }

    candidates
}

/// Checks if a file has a supported image extension (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists the images directly inside `dir`, naturally sorted.
///
/// Subdirectories are not searched. An unreadable directory yields an empty list.
#[must_use]
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "failed to list source directory");
            return Vec::new();
        }
    };

    let mut images: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    images.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    images
}

/// Returns whether `entry` is the literal `remote` source.
#[must_use]
pub fn is_remote_sentinel(entry: &str) -> bool { entry.trim().eq_ignore_ascii_case(REMOTE_SENTINEL) }
