//! Integration tests for the self-healing configuration store.
//!
//! Every test works on a configuration file inside its own temp directory.

use std::fs;

use fluidbg_lib::config::{ConfigKey, ConfigStore, IntervalUnit};
use fluidbg_lib::error::FluidError;
use serde_json::{Value, json};
use tempfile::TempDir;

fn read_json(store: &ConfigStore) -> Value {
    serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap()
}

// ============================================================================
// Healing
// ============================================================================

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());

    store.validate();

    assert_eq!(
        read_json(&store),
        json!({
            "sourcePaths": [],
            "intervalIndex": 0,
            "interval": 1.0,
            "enabled": false,
            "startHidden": false,
            "wallpaperModeIndex": 0,
            "tileImage": false,
            "remoteImageEnabled": false
        })
    );
}

#[test]
fn test_garbage_file_is_reset() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    fs::write(store.path(), "this is { not json").unwrap();

    assert!(!store.get::<bool>(ConfigKey::Enabled));
    assert_eq!(read_json(&store)["interval"], 1.0);
}

#[test]
fn test_non_object_file_is_reset() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    fs::write(store.path(), "[1, 2, 3]").unwrap();

    store.validate();

    assert!(read_json(&store).is_object());
}

#[test]
fn test_mistyped_keys_are_backfilled_and_unknown_keys_kept() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    fs::write(
        store.path(),
        r#"{
            "enabled": "yes",
            "intervalIndex": 2.5,
            "sourcePaths": ["/a.png", 3],
            "tileImage": true,
            "theme": "dark"
        }"#,
    )
    .unwrap();

    store.validate();
    let healed = read_json(&store);

    assert_eq!(healed["enabled"], false);
    assert_eq!(healed["intervalIndex"], 0);
    assert_eq!(healed["sourcePaths"], json!([]));
    assert_eq!(healed["tileImage"], true);
    assert_eq!(healed["theme"], "dark");
}

#[test]
fn test_healthy_file_with_comments_is_left_alone() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    store.validate();

    let mut content = fs::read_to_string(store.path()).unwrap();
    content.insert_str(0, "// my wallpapers\n");
    fs::write(store.path(), &content).unwrap();

    store.validate();
    assert!(store.get::<Vec<String>>(ConfigKey::SourcePaths).is_empty());

    assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
}

// ============================================================================
// Reads and writes
// ============================================================================

#[test]
fn test_set_then_get_round_trips_through_a_new_store() {
    let dir = TempDir::new().unwrap();
    ConfigStore::in_dir(dir.path()).set(ConfigKey::WallpaperModeIndex, 3);

    let reopened = ConfigStore::in_dir(dir.path());

    assert_eq!(reopened.get::<i64>(ConfigKey::WallpaperModeIndex), 3);
    assert_eq!(reopened.snapshot().wallpaper_mode().name(), "center");
}

#[test]
fn test_mistyped_set_is_ignored() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());

    store.set(ConfigKey::Enabled, "true");

    assert!(!store.get::<bool>(ConfigKey::Enabled));
}

#[test]
fn test_sources_keep_order_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let folder = dir.path().to_string_lossy().to_string();

    store.add_source(&folder).unwrap();
    store.add_source("REMOTE").unwrap();
    store.add_source(&folder).unwrap();

    let sources: Vec<String> = store.get(ConfigKey::SourcePaths);
    assert_eq!(sources, vec![folder.clone(), "remote".to_string(), folder.clone()]);

    assert!(store.remove_source(&folder));
    let sources: Vec<String> = store.get(ConfigKey::SourcePaths);
    assert_eq!(sources, vec!["remote".to_string(), folder]);
}

// ============================================================================
// Interval bound
// ============================================================================

#[test]
fn test_interval_within_bound_is_stored() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());

    let seconds = store.set_interval(24.0, IntervalUnit::Days).unwrap();

    assert!((seconds - 2_073_600.0).abs() < f64::EPSILON);
    assert_eq!(store.get::<i64>(ConfigKey::IntervalIndex), 3);
    assert!((store.get::<f64>(ConfigKey::Interval) - 24.0).abs() < f64::EPSILON);
}

#[test]
fn test_interval_past_bound_is_rejected_without_change() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    store.set_interval(5.0, IntervalUnit::Minutes).unwrap();

    let result = store.set_interval(25.0, IntervalUnit::Days);

    assert!(matches!(result, Err(FluidError::IntervalTooLong { .. })));
    let config = store.snapshot();
    assert_eq!(config.interval_unit(), IntervalUnit::Minutes);
    assert!((config.interval - 5.0).abs() < f64::EPSILON);
}
