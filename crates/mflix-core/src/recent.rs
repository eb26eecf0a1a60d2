use std::sync::Arc;

use tracing::debug;

use crate::storage::{load_json, persist_json, remove_key, KeyValueStorage};

pub const RECENT_SEARCHES_KEY: &str = "mflix.searches";
pub const RECENT_SEARCHES_LIMIT: usize = 8;

/// Titles picked from search results, most recent first.
pub struct RecentSearches {
    storage: Arc<dyn KeyValueStorage>,
    entries: Vec<String>,
}

impl RecentSearches {
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut entries: Vec<String> =
            load_json(storage.as_ref(), RECENT_SEARCHES_KEY).unwrap_or_default();
        entries.truncate(RECENT_SEARCHES_LIMIT);
        debug!("Loaded {} recent searches", entries.len());
        Self { storage, entries }
    }

    pub fn record(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != title);
        self.entries.insert(0, title.to_string());
        self.entries.truncate(RECENT_SEARCHES_LIMIT);
        persist_json(self.storage.as_ref(), RECENT_SEARCHES_KEY, &self.entries);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        remove_key(self.storage.as_ref(), RECENT_SEARCHES_KEY);
    }
}
