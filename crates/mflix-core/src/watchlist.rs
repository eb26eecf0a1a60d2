use std::sync::Arc;

use chrono::Utc;
use mflix_models::{Title, WatchlistEntry};
use tracing::{debug, info};

use crate::catalog::CatalogIndex;
use crate::storage::{load_json, persist_json, KeyValueStorage};

pub const WATCHLIST_KEY: &str = "mflix.watchlist";

/// The user's "My List": a persisted set of title ids, oldest first.
///
/// Every mutation writes the whole list through to storage before returning.
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<WatchlistEntry>,
}

impl WatchlistStore {
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut entries: Vec<WatchlistEntry> =
            load_json(storage.as_ref(), WATCHLIST_KEY).unwrap_or_default();

        let before = entries.len();
        let mut seen = std::collections::HashSet::new();
        entries.retain(|entry| seen.insert(entry.title_id.clone()));
        if entries.len() != before {
            debug!("Dropped {} duplicate watchlist entries", before - entries.len());
        }

        info!("Loaded watchlist: {} titles", entries.len());
        Self { storage, entries }
    }

    pub fn is_member(&self, title_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.title_id == title_id)
    }

    /// Add the title if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, title: &Title) -> bool {
        if self.remove_entry(&title.id) {
            self.persist();
            return false;
        }

        self.entries.push(WatchlistEntry {
            title_id: title.id.clone(),
            added_at: Utc::now(),
        });
        self.persist();
        true
    }

    /// Returns whether the title was a member.
    pub fn remove(&mut self, title_id: &str) -> bool {
        let removed = self.remove_entry(title_id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Members resolved against the catalog, in list order. Ids the catalog
    /// does not know are skipped.
    pub fn titles<'a>(&self, catalog: &'a CatalogIndex) -> Vec<&'a Title> {
        self.entries
            .iter()
            .filter_map(|entry| catalog.get(&entry.title_id))
            .collect()
    }

    fn remove_entry(&mut self, title_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.title_id != title_id);
        self.entries.len() != before
    }

    fn persist(&self) {
        persist_json(self.storage.as_ref(), WATCHLIST_KEY, &self.entries);
    }
}
