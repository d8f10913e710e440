//! Bounded rotation history.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::constants::sources::HISTORY_CAPACITY;

/// One applied (or attempted) wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The image path for local picks, the attribution for remote ones.
    pub display_text: String,
    /// Local time of the tick, `HH:MM:SS`.
    pub timestamp: String,
    /// The concrete image that was handed to the setter.
    pub path: PathBuf,
}

impl HistoryEntry {
    /// Creates an entry stamped with the time-of-day of `at`.
    #[must_use]
    pub fn new(display_text: impl Into<String>, path: &Path, at: DateTime<Local>) -> Self {
        Self {
            display_text: display_text.into(),
            timestamp: at.format("%H:%M:%S").to_string(),
            path: path.to_path_buf(),
        }
    }
}

/// Newest-first record of past selections, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self { Self::with_capacity(HISTORY_CAPACITY) }
}

impl HistoryLog {
    /// Creates an empty log with the default capacity.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates an empty log that keeps at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity.min(64)), capacity }
    }

    /// Inserts `entry` at the front, dropping the oldest entry beyond capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Returns a snapshot of the entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> { self.entries.iter().cloned().collect() }

    /// Returns the entry at `index` (0 is the newest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> { self.entries.get(index) }

    /// Returns the newest entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> { self.entries.front() }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(name: &str) -> HistoryEntry {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 9, 5, 7).unwrap();
        HistoryEntry::new(name, Path::new(name), at)
    }

    #[test]
    fn test_entry_timestamp_format() {
        assert_eq!(entry("/a.png").timestamp, "09:05:07");
    }

    #[test]
    fn test_record_is_newest_first() {
        let mut log = HistoryLog::new();
        log.record(entry("first"));
        log.record(entry("second"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().display_text, "second");
        assert_eq!(log.get(1).unwrap().display_text, "first");
        assert!(log.get(2).is_none());
    }

    #[test]
    fn test_record_truncates_at_capacity() {
        let mut log = HistoryLog::with_capacity(3);
        for name in ["a", "b", "c", "d"] {
            log.record(entry(name));
        }

        let names: Vec<String> = log.entries().into_iter().map(|e| e.display_text).collect();
        assert_eq!(names, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_default_capacity() {
        let mut log = HistoryLog::default();
        for i in 0..=HISTORY_CAPACITY {
            log.record(entry(&i.to_string()));
        }

        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(log.latest().unwrap().display_text, HISTORY_CAPACITY.to_string());
        assert_eq!(log.get(HISTORY_CAPACITY - 1).unwrap().display_text, "1");
    }

    #[test]
    fn test_entries_is_a_snapshot() {
        let mut log = HistoryLog::new();
        log.record(entry("a"));
        let snapshot = log.entries();
        log.record(entry("b"));

        assert_eq!(snapshot.len(), 1);
        assert!(!log.is_empty());
    }
}
