use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mflix_config::{Config, NotificationConfig};
use mflix_models::{Severity, Title};
use mflix_sources::CatalogSource;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogIndex, CatalogLimits};
use crate::feed::{build_home_feed, HomeFeed};
use crate::history::WatchHistoryStore;
use crate::normalize::{normalize, normalize_all};
use crate::notify::NotificationChannel;
use crate::progress::{lock_history, ProgressSaver, SharedHistory};
use crate::recent::RecentSearches;
use crate::storage::KeyValueStorage;
use crate::watchlist::WatchlistStore;

pub const ADDED_TO_LIST: &str = "✓ Added to My List";
pub const REMOVED_FROM_LIST: &str = "Removed from My List";
pub const HISTORY_CLEARED: &str = "Watch history cleared";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub limits: CatalogLimits,
    pub notifications: NotificationConfig,
    pub save_debounce: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            limits: CatalogLimits::from(&config.display),
            notifications: config.notifications.clone(),
            save_debounce: Duration::from_secs(config.playback.save_debounce_secs),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything one running client needs: the catalog, the persisted stores and
/// the notification channel. Surfaces get it passed in explicitly.
pub struct Session {
    catalog: CatalogIndex,
    watchlist: WatchlistStore,
    history: SharedHistory,
    recent: RecentSearches,
    notifications: NotificationChannel,
    settings: SessionSettings,
}

impl Session {
    /// Load every store from `storage`. The catalog starts empty.
    pub fn open(storage: Arc<dyn KeyValueStorage>, settings: SessionSettings) -> Self {
        Self {
            catalog: CatalogIndex::new(Vec::new(), settings.limits),
            watchlist: WatchlistStore::load(Arc::clone(&storage)),
            history: Arc::new(Mutex::new(WatchHistoryStore::load(Arc::clone(&storage)))),
            recent: RecentSearches::load(storage),
            notifications: NotificationChannel::from_config(&settings.notifications),
            settings,
        }
    }

    /// Fetch and normalize the whole catalog, returning how many titles it holds.
    ///
    /// A failed fetch leaves an empty catalog behind; it is logged, not returned.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> usize {
        let records = match source.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to fetch catalog from {}: {}", source.source_name(), e);
                Vec::new()
            }
        };

        self.catalog = CatalogIndex::new(normalize_all(&records), self.settings.limits);
        info!(
            "Loaded {} titles from {} ({} records)",
            self.catalog.len(),
            source.source_name(),
            records.len()
        );
        self.catalog.len()
    }

    /// A single title, from the loaded catalog when present, otherwise fetched.
    pub async fn load_title(&self, source: &dyn CatalogSource, id: &str) -> Option<Title> {
        if let Some(title) = self.catalog.get(id) {
            debug!("Title {} served from loaded catalog", id);
            return Some(title.clone());
        }

        match source.fetch_one(id).await {
            Ok(Some(record)) => normalize(&record).ok(),
            Ok(None) => {
                debug!("Title {} not found upstream", id);
                None
            }
            Err(e) => {
                warn!("Failed to fetch title {}: {}", id, e);
                None
            }
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    /// Toggle a title on My List and tell the user.
    ///
    /// Returns the new membership, or `None` when the id is neither listed nor
    /// in the catalog.
    pub fn toggle_watchlist(&mut self, title_id: &str) -> Option<bool> {
        let added = if self.watchlist.is_member(title_id) {
            self.watchlist.remove(title_id);
            false
        } else {
            let title = self.catalog.get(title_id)?;
            self.watchlist.toggle(title)
        };

        if added {
            self.notifications.notify(ADDED_TO_LIST, Severity::Success);
        } else {
            self.notifications.notify(REMOVED_FROM_LIST, Severity::Info);
        }
        Some(added)
    }

    pub fn remove_from_watchlist(&mut self, title_id: &str) -> bool {
        self.watchlist.remove(title_id)
    }

    pub fn clear_watchlist(&mut self) {
        self.watchlist.clear();
    }

    pub fn history(&self) -> MutexGuard<'_, WatchHistoryStore> {
        lock_history(&self.history)
    }

    /// Handle for background savers.
    pub fn history_handle(&self) -> SharedHistory {
        Arc::clone(&self.history)
    }

    /// Debounced saver writing into this session's history.
    pub fn progress_saver(&self) -> ProgressSaver {
        ProgressSaver::new(self.history_handle(), self.settings.save_debounce)
    }

    pub fn clear_history(&mut self) {
        lock_history(&self.history).clear();
        self.notifications.notify(HISTORY_CLEARED, Severity::Info);
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn recent_searches_mut(&mut self) -> &mut RecentSearches {
        &mut self.recent
    }

    pub fn notifications(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    /// Build the home feed and hand it to `render`.
    ///
    /// The feed borrows the history, which stays locked while `render` runs.
    pub fn home_feed<R>(&self, render: impl FnOnce(&HomeFeed<'_>) -> R) -> R {
        let history = self.history();
        let feed = build_home_feed(&self.catalog, &self.watchlist, history.entries());
        render(&feed)
    }
}
