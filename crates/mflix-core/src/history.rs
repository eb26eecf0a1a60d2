use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use mflix_models::{HistoryEntry, Title};
use regex::Regex;
use tracing::info;

use crate::storage::{load_json, persist_json, KeyValueStorage};

pub const HISTORY_KEY: &str = "mflix.history";

static HOURS_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)h\s*(\d+)?m?").unwrap());
static LEADING_MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// Playback progress log, most recently saved first.
pub struct WatchHistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<HistoryEntry>,
}

impl WatchHistoryStore {
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut entries: Vec<HistoryEntry> =
            load_json(storage.as_ref(), HISTORY_KEY).unwrap_or_default();

        let mut seen = std::collections::HashSet::new();
        entries.retain(|entry| seen.insert(entry.title_id.clone()));

        info!("Loaded watch history: {} entries", entries.len());
        Self { storage, entries }
    }

    pub fn save_progress(&mut self, title: &Title, position_seconds: f64, duration_seconds: f64) -> &HistoryEntry {
        self.save_progress_at(title, position_seconds, duration_seconds, Utc::now())
    }

    /// Upsert the entry for `title` and move it to the front.
    ///
    /// Negative and non-finite inputs are stored as 0.
    pub fn save_progress_at(
        &mut self,
        title: &Title,
        position_seconds: f64,
        duration_seconds: f64,
        at: DateTime<Utc>,
    ) -> &HistoryEntry {
        self.entries.retain(|entry| entry.title_id != title.id);
        self.entries.insert(
            0,
            HistoryEntry {
                title_id: title.id.clone(),
                title: title.clone(),
                position_seconds: sanitize_seconds(position_seconds),
                duration_seconds: sanitize_seconds(duration_seconds),
                updated_at: at,
            },
        );
        self.persist();
        &self.entries[0]
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, title_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.title_id != title_id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn get(&self, title_id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.title_id == title_id)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Watched share of a title in percent; 0 when it has no entry.
    pub fn progress_percent(&self, title_id: &str) -> f64 {
        self.get(title_id).map(HistoryEntry::progress_percent).unwrap_or(0.0)
    }

    /// Sum of the runtimes of every title in the log.
    pub fn total_watched_minutes(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| runtime_minutes(entry.title.runtime_label.as_deref()))
            .sum()
    }

    pub fn hours_watched(&self) -> u64 {
        self.total_watched_minutes() / 60
    }

    fn persist(&self) {
        persist_json(self.storage.as_ref(), HISTORY_KEY, &self.entries);
    }
}

fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Minutes in a runtime label such as `"2h 15m"`, `"2h"` or `"95 min"`.
/// Anything unparseable counts as 0.
pub fn runtime_minutes(label: Option<&str>) -> u64 {
    let Some(label) = label else {
        return 0;
    };

    if let Some(caps) = HOURS_MINUTES.captures(label) {
        let hours: u64 = caps[1].parse().unwrap_or(0);
        let minutes: u64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        return hours.saturating_mul(60).saturating_add(minutes);
    }

    LEADING_MINUTES
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::test_support::title;
    use chrono::TimeZone;

    fn store() -> WatchHistoryStore {
        WatchHistoryStore::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_save_twice_keeps_one_entry_with_latest_values() {
        let mut history = store();
        let alpha = title("a", "Alpha");
        let beta = title("b", "Beta");
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        history.save_progress_at(&alpha, 10.0, 100.0, t0);
        history.save_progress_at(&beta, 5.0, 50.0, t1);
        history.save_progress_at(&alpha, 60.0, 120.0, t2);

        assert_eq!(history.len(), 2);
        let latest = &history.entries()[0];
        assert_eq!(latest.title_id, "a");
        assert_eq!(latest.position_seconds, 60.0);
        assert_eq!(latest.duration_seconds, 120.0);
        assert_eq!(latest.updated_at, t2);
        assert_eq!(history.progress_percent("a"), 50.0);
    }

    #[test]
    fn test_progress_percent_bounds() {
        let mut history = store();
        history.save_progress(&title("zero", "Zero"), 30.0, 0.0);
        history.save_progress(&title("full", "Full"), 90.0, 90.0);
        history.save_progress(&title("over", "Over"), 200.0, 90.0);

        assert_eq!(history.progress_percent("zero"), 0.0);
        assert_eq!(history.progress_percent("full"), 100.0);
        assert_eq!(history.progress_percent("over"), 100.0);
        assert_eq!(history.progress_percent("missing"), 0.0);
    }

    #[test]
    fn test_bad_inputs_are_clamped() {
        let mut history = store();
        let entry = history.save_progress(&title("a", "Alpha"), -5.0, f64::NAN);
        assert_eq!(entry.position_seconds, 0.0);
        assert_eq!(entry.duration_seconds, 0.0);
        assert_eq!(entry.progress_percent(), 0.0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = store();
        history.save_progress(&title("a", "Alpha"), 1.0, 2.0);
        history.save_progress(&title("b", "Beta"), 1.0, 2.0);

        assert!(history.remove("a"));
        assert!(!history.remove("a"));
        assert!(history.get("a").is_none());
        assert!(history.get("b").is_some());

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_round_trip_through_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut alpha = title("a", "Alpha");
        alpha.runtime_label = Some("2h 10m".to_string());

        let mut history = WatchHistoryStore::load(Arc::new(FileStorage::new(dir.path())));
        history.save_progress(&title("b", "Beta"), 5.0, 10.0);
        history.save_progress(&alpha, 30.0, 60.0);
        drop(history);

        let reloaded = WatchHistoryStore::load(Arc::new(FileStorage::new(dir.path())));
        let ids: Vec<_> = reloaded.entries().iter().map(|e| e.title_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(reloaded.entries()[0].title, alpha);
        assert_eq!(reloaded.progress_percent("a"), 50.0);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(HISTORY_KEY, "[{\"title_id\": 3}]").unwrap();
        assert!(WatchHistoryStore::load(storage).is_empty());
    }

    #[test]
    fn test_runtime_minutes() {
        assert_eq!(runtime_minutes(Some("2h 15m")), 135);
        assert_eq!(runtime_minutes(Some("2h")), 120);
        assert_eq!(runtime_minutes(Some("1h45m")), 105);
        assert_eq!(runtime_minutes(Some("95 min")), 95);
        assert_eq!(runtime_minutes(Some("N/A")), 0);
        assert_eq!(runtime_minutes(None), 0);
    }

    #[test]
    fn test_total_watched_minutes_and_hours() {
        let mut history = store();
        let runtimes = [("a", Some("2h 10m")), ("b", Some("55")), ("c", Some("unknown")), ("d", None)];
        for (id, runtime) in runtimes {
            let mut t = title(id, id);
            t.runtime_label = runtime.map(str::to_string);
            history.save_progress(&t, 1.0, 2.0);
        }

        assert_eq!(history.total_watched_minutes(), 185);
        assert_eq!(history.hours_watched(), 3);
    }
}
