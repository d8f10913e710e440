//! Tilde expansion for user-supplied source paths.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Surrounding whitespace is trimmed; an empty string expands to an empty
/// path. Absolute and relative paths are otherwise returned unchanged.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands `path` and joins it onto `base_dir` if it is still relative.
///
/// ```ignore
/// use std::path::Path;
/// use fluidbg_lib::platform::path::expand_and_resolve;
///
/// let resolved = expand_and_resolve("Pictures/walls", Path::new("/home/me"));
/// assert_eq!(resolved, Path::new("/home/me/Pictures/walls"));
/// ```
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}
