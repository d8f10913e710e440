//! Persistent, self-healing configuration store.
//!
//! The store owns one JSON object on disk. Every read first validates the
//! file: a missing, unreadable or non-object file is replaced with `{}` and
//! every schema key that is absent or mistyped is backfilled with its default.
//! Keys the schema does not know about are left alone.
//!
//! I/O problems never reach callers. They are logged and the store keeps
//! answering with defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::types::{ConfigError, ConfigKey, FluidConfig, IntervalUnit, checked_interval_seconds};
use crate::constants::files::CONFIG_FILE_NAME;
use crate::constants::interval::DEFAULT_MULTIPLIER;
use crate::constants::sources::REMOTE_SENTINEL;
use crate::error::FluidError;
use crate::platform::path::expand_and_resolve;
use crate::wallpaper::sources::is_remote_sentinel;

/// Typed, schema-validated key/value store backed by a JSON file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigStore {
    /// Creates a store for the configuration file at `path`.
    ///
    /// Nothing is touched on disk until the first access.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into(), lock: Mutex::new(()) } }

    /// Creates a store for `config.json` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self { Self::new(dir.join(CONFIG_FILE_NAME)) }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Ensures the file exists and every schema key is present and well typed.
    ///
    /// Idempotent: a second call on a healed file does not rewrite it.
    pub fn validate(&self) {
        let _guard = self.lock.lock();
        self.load_healed();
    }

    /// Returns the value stored under `key`.
    ///
    /// Falls back to `T::default()` if the stored value cannot be read as `T`,
    /// which only happens when `T` does not match the key's declared type.
    #[must_use]
    pub fn get<T: DeserializeOwned + Default>(&self, key: ConfigKey) -> T {
        let value = self.get_value(key);
        serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::debug!(key = %key, error = %err, "config value has unexpected type");
            T::default()
        })
    }

    /// Returns the raw JSON value stored under `key`.
    #[must_use]
    pub fn get_value(&self, key: ConfigKey) -> Value {
        let _guard = self.lock.lock();
        self.load_healed().remove(key.as_str()).unwrap_or_else(|| key.default_value())
    }

    /// Overwrites `key` with `value` and persists the file.
    ///
    /// A value that does not match the key's declared type is ignored, so the
    /// file never holds a mistyped schema key. A new `interval` or
    /// `intervalIndex` that would push the effective interval past the timer
    /// bound is ignored as well.
    pub fn set(&self, key: ConfigKey, value: impl Into<Value>) {
        let value = value.into();
        if !key.accepts(&value) {
            tracing::warn!(key = %key, value = %value, "refusing to store mistyped config value");
            return;
        }

        let touches_interval = matches!(key, ConfigKey::Interval | ConfigKey::IntervalIndex);
        self.update(|object| {
            let previous = object.insert(key.as_str().to_string(), value);
            if !touches_interval {
                return;
            }

            if let Err(err) = stored_interval_seconds(object) {
                tracing::warn!(key = %key, error = %err, "refusing to store out-of-range interval");
                match previous {
                    Some(previous) => object.insert(key.as_str().to_string(), previous),
                    None => object.remove(key.as_str()),
                };
            }
        });
    }

    /// Returns the whole configuration as a typed struct.
    #[must_use]
    pub fn snapshot(&self) -> FluidConfig {
        let object = {
            let _guard = self.lock.lock();
            self.load_healed()
        };

        serde_json::from_value(Value::Object(object)).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to read configuration snapshot, using defaults");
            FluidConfig::default()
        })
    }

    /// Stores a new interval after checking it against the timer bound.
    ///
    /// On success both `interval` and `intervalIndex` are written and the
    /// effective interval in seconds is returned. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::IntervalTooLong`] if the interval does not fit the
    /// timer, or [`FluidError::InvalidArguments`] for a negative multiplier.
    pub fn set_interval(&self, multiplier: f64, unit: IntervalUnit) -> Result<f64, FluidError> {
        let seconds = checked_interval_seconds(multiplier, unit)?;

        self.update(|object| {
            object.insert(ConfigKey::Interval.as_str().to_string(), Value::from(multiplier));
            object.insert(ConfigKey::IntervalIndex.as_str().to_string(), Value::from(unit.index()));
        });

        Ok(seconds)
    }

    /// Turns the remote daily image on or off.
    ///
    /// A literal `remote` entry in `sourcePaths` also enables it, so turning
    /// it off drops those entries as well.
    pub fn set_remote_enabled(&self, enabled: bool) {
        self.update(|object| {
            object.insert(ConfigKey::RemoteImageEnabled.as_str().to_string(), Value::from(enabled));
            if !enabled {
                let mut sources = source_list(object);
                sources.retain(|source| !is_remote_sentinel(source));
                object.insert(ConfigKey::SourcePaths.as_str().to_string(), Value::from(sources));
            }
        });

        tracing::info!(enabled, "remote image setting changed");
    }

    /// Appends a source entry and returns the string that was stored.
    ///
    /// `remote` (any case) is stored as the remote sentinel. Anything else is
    /// tilde-expanded, resolved against the working directory and must exist.
    /// Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::NotFound`] if the path does not exist, or
    /// [`FluidError::InvalidArguments`] for an empty entry.
    pub fn add_source(&self, entry: &str) -> Result<String, FluidError> {
        let stored = normalize_source(entry)?;
        if stored != REMOTE_SENTINEL && !Path::new(&stored).exists() {
            return Err(FluidError::NotFound(format!("Source path does not exist: {stored}")));
        }

        self.update(|object| {
            let mut sources = source_list(object);
            sources.push(stored.clone());
            object.insert(ConfigKey::SourcePaths.as_str().to_string(), Value::from(sources));
        });

        tracing::info!(source = %stored, "added wallpaper source");
        Ok(stored)
    }

    /// Removes the first source entry matching `entry`.
    ///
    /// The entry is compared as given and, failing that, in its resolved form.
    /// Returns `false` if nothing matched.
    pub fn remove_source(&self, entry: &str) -> bool {
        let resolved = normalize_source(entry).ok();
        let mut removed = false;

        self.update(|object| {
            let mut sources = source_list(object);
            let position = sources
                .iter()
                .position(|source| source == entry)
                .or_else(|| resolved.as_ref().and_then(|r| sources.iter().position(|s| s == r)));

            if let Some(position) = position {
                sources.remove(position);
                object.insert(ConfigKey::SourcePaths.as_str().to_string(), Value::from(sources));
                removed = true;
            }
        });

        if removed {
            tracing::info!(source = %entry, "removed wallpaper source");
        }
        removed
    }

    /// Validates, applies `mutate` to the object and writes it back if it changed.
    fn update(&self, mutate: impl FnOnce(&mut Map<String, Value>)) {
        let _guard = self.lock.lock();
        let mut object = self.load_healed();
        let before = object.clone();

        mutate(&mut object);

        if object != before {
            self.persist(&object);
        }
    }

    /// Loads the file, heals it and returns the healed object.
    ///
    /// Must be called with the lock held.
    fn load_healed(&self) -> Map<String, Value> {
        let (mut object, needs_write) = match self.read_object() {
            Ok(object) => (object, false),
            Err(ConfigError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "config file missing, creating it");
                (Map::new(), true)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "config file unreadable, resetting it"
                );
                (Map::new(), true)
            }
        };

        let backfilled = backfill(&mut object);
        if needs_write || backfilled {
            self.persist(&object);
        }

        object
    }

    fn read_object(&self) -> Result<Map<String, Value>, ConfigError> {
        let content = fs::read_to_string(&self.path)?;
        let stripped = json_comments::StripComments::new(content.as_bytes());
        match serde_json::from_reader(stripped)? {
            Value::Object(object) => Ok(object),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    fn persist(&self, object: &Map<String, Value>) {
        if let Err(err) = self.write_object(object) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to write config file");
        }
    }

    /// Writes the object through a temporary file in the same directory.
    fn write_object(&self, object: &Map<String, Value>) -> Result<(), ConfigError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut file, object)?;
        file.write_all(b"\n")?;
        file.persist(&self.path).map_err(|err| ConfigError::IoError(err.error))?;
        Ok(())
    }
}

/// Backfills absent or mistyped schema keys. Returns `true` if anything changed.
fn backfill(object: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    for key in ConfigKey::ALL {
        let valid = object.get(key.as_str()).is_some_and(|value| key.accepts(value));
        if !valid {
            tracing::debug!(key = %key, "backfilling config key with its default");
            object.insert(key.as_str().to_string(), key.default_value());
            changed = true;
        }
    }

    changed
}

/// Computes the effective interval held by `object`, checked against the timer bound.
fn stored_interval_seconds(object: &Map<String, Value>) -> Result<f64, FluidError> {
    let multiplier = object
        .get(ConfigKey::Interval.as_str())
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_MULTIPLIER);
    let unit = object
        .get(ConfigKey::IntervalIndex.as_str())
        .and_then(Value::as_i64)
        .and_then(IntervalUnit::from_index)
        .unwrap_or_default();

    checked_interval_seconds(multiplier, unit)
}

fn source_list(object: &Map<String, Value>) -> Vec<String> {
    object
        .get(ConfigKey::SourcePaths.as_str())
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn normalize_source(entry: &str) -> Result<String, FluidError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(FluidError::InvalidArguments("Source path cannot be empty".to_string()));
    }
    if is_remote_sentinel(entry) {
        return Ok(REMOTE_SENTINEL.to_string());
    }

    let base = std::env::current_dir().unwrap_or_default();
    Ok(expand_and_resolve(entry, &base).to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        (dir, store)
    }

    fn read_raw(store: &ConfigStore) -> Value {
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_validate_creates_missing_file() {
        let (_dir, store) = store();
        assert!(!store.path().exists());

        store.validate();

        let raw = read_raw(&store);
        for key in ConfigKey::ALL {
            assert_eq!(raw[key.as_str()], key.default_value());
        }
    }

    #[test]
    fn test_validate_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::in_dir(&dir.path().join("nested").join("fluidbg"));

        store.validate();

        assert!(store.path().exists());
    }

    #[test]
    fn test_validate_replaces_garbage() {
        let (_dir, store) = store();
        fs::write(store.path(), "not json").unwrap();

        store.validate();

        assert_eq!(read_raw(&store)["interval"], json!(1.0));
    }

    #[test]
    fn test_validate_replaces_non_object() {
        let (_dir, store) = store();
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        store.validate();

        assert!(read_raw(&store).is_object());
    }

    #[test]
    fn test_validate_fixes_mistyped_keys_and_keeps_the_rest() {
        let (_dir, store) = store();
        fs::write(
            store.path(),
            r#"{"enabled": "yes", "intervalIndex": 1.5, "interval": 3, "custom": 7}"#,
        )
        .unwrap();

        store.validate();

        let raw = read_raw(&store);
        assert_eq!(raw["enabled"], json!(false));
        assert_eq!(raw["intervalIndex"], json!(0));
        assert_eq!(raw["interval"], json!(3));
        assert_eq!(raw["custom"], json!(7));
    }

    #[test]
    fn test_validate_accepts_comments_without_rewriting() {
        let (_dir, store) = store();
        let content = r#"{
            // rotate every two minutes
            "sourcePaths": [],
            "intervalIndex": 1,
            "interval": 2,
            "enabled": true,
            "startHidden": false,
            "wallpaperModeIndex": 0,
            "tileImage": false,
            "remoteImageEnabled": false
        }"#;
        fs::write(store.path(), content).unwrap();

        store.validate();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
        assert!(store.get::<bool>(ConfigKey::Enabled));
    }

    #[test]
    fn test_get_set_round_trip() {
        let (_dir, store) = store();

        store.set(ConfigKey::Enabled, true);
        store.set(ConfigKey::Interval, 2.5);
        store.set(ConfigKey::WallpaperModeIndex, 3);
        store.set(ConfigKey::SourcePaths, vec!["/a".to_string(), "remote".to_string()]);

        assert!(store.get::<bool>(ConfigKey::Enabled));
        assert!((store.get::<f64>(ConfigKey::Interval) - 2.5).abs() < f64::EPSILON);
        assert_eq!(store.get::<i64>(ConfigKey::WallpaperModeIndex), 3);
        assert_eq!(store.get::<Vec<String>>(ConfigKey::SourcePaths), vec!["/a", "remote"]);
    }

    #[test]
    fn test_set_ignores_mistyped_value() {
        let (_dir, store) = store();

        store.set(ConfigKey::Enabled, "true");

        assert!(!store.get::<bool>(ConfigKey::Enabled));
    }

    #[test]
    fn test_set_refuses_interval_keys_past_the_bound() {
        let (_dir, store) = store();
        store.set(ConfigKey::Interval, 100.0);

        store.set(ConfigKey::IntervalIndex, 4);
        assert_eq!(store.get::<i64>(ConfigKey::IntervalIndex), 0);

        store.set(ConfigKey::Interval, 10.0);
        store.set(ConfigKey::IntervalIndex, 3);
        store.set(ConfigKey::Interval, 25.0);
        assert_eq!(store.get::<i64>(ConfigKey::IntervalIndex), 3);
        assert!((store.get::<f64>(ConfigKey::Interval) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_interval_is_refused_and_healed() {
        let (_dir, store) = store();

        store.set(ConfigKey::Interval, -5.0);
        assert!((store.get::<f64>(ConfigKey::Interval) - 1.0).abs() < f64::EPSILON);

        fs::write(store.path(), r#"{"interval": -2.0}"#).unwrap();
        store.validate();
        assert_eq!(read_raw(&store)["interval"], json!(1.0));
    }

    #[test]
    fn test_snapshot_reflects_file() {
        let (_dir, store) = store();
        store.set(ConfigKey::TileImage, true);
        store.set(ConfigKey::IntervalIndex, 2);

        let config = store.snapshot();

        assert!(config.tile_image);
        assert_eq!(config.interval_index, 2);
        assert!((config.interval - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_interval_rejects_and_keeps_previous() {
        let (_dir, store) = store();
        store.set_interval(5.0, IntervalUnit::Minutes).unwrap();

        let result = store.set_interval(4.0, IntervalUnit::Weeks);

        assert!(matches!(result, Err(FluidError::IntervalTooLong { .. })));
        assert!((store.get::<f64>(ConfigKey::Interval) - 5.0).abs() < f64::EPSILON);
        assert_eq!(store.get::<i64>(ConfigKey::IntervalIndex), 1);
    }

    #[test]
    fn test_add_source_requires_existing_path() {
        let (dir, store) = store();

        let missing = dir.path().join("missing.png");
        assert!(matches!(
            store.add_source(&missing.to_string_lossy()),
            Err(FluidError::NotFound(_))
        ));
        assert!(store.get::<Vec<String>>(ConfigKey::SourcePaths).is_empty());
    }

    #[test]
    fn test_add_source_allows_duplicates_and_remote() {
        let (dir, store) = store();
        let image = dir.path().join("a.png");
        fs::write(&image, b"").unwrap();
        let image = image.to_string_lossy().into_owned();

        store.add_source(&image).unwrap();
        store.add_source(&image).unwrap();
        assert_eq!(store.add_source("REMOTE").unwrap(), "remote");

        assert_eq!(store.get::<Vec<String>>(ConfigKey::SourcePaths), vec![
            image.clone(),
            image,
            "remote".to_string()
        ]);
    }

    #[test]
    fn test_remove_source_removes_first_match_only() {
        let (_dir, store) = store();
        store.set(ConfigKey::SourcePaths, vec!["/a", "/b", "/a"]);

        assert!(store.remove_source("/a"));
        assert_eq!(store.get::<Vec<String>>(ConfigKey::SourcePaths), vec!["/b", "/a"]);

        assert!(!store.remove_source("/c"));
    }

    #[test]
    fn test_disabling_remote_drops_listed_remote_entries() {
        let (_dir, store) = store();
        store.set(ConfigKey::SourcePaths, vec!["remote", "/a", " Remote "]);
        store.set_remote_enabled(true);

        assert_eq!(store.get::<Vec<String>>(ConfigKey::SourcePaths), vec!["remote", "/a", " Remote "]);

        store.set_remote_enabled(false);

        assert!(!store.get::<bool>(ConfigKey::RemoteImageEnabled));
        assert_eq!(store.get::<Vec<String>>(ConfigKey::SourcePaths), vec!["/a"]);
    }
}
