pub mod catalog;
pub mod error;
pub mod feed;
pub mod history;
pub mod normalize;
pub mod notify;
pub mod progress;
pub mod recent;
pub mod session;
pub mod storage;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{CatalogIndex, CatalogLimits, GenreTag, MIN_SEARCH_CHARS};
pub use error::{NormalizeError, StorageError};
pub use feed::{build_home_feed, HomeFeed, Rail, RailItem, RailKind};
pub use history::{runtime_minutes, WatchHistoryStore, HISTORY_KEY};
pub use normalize::{normalize, normalize_all};
pub use notify::NotificationChannel;
pub use progress::{ProgressSaver, SharedHistory};
pub use recent::{RecentSearches, RECENT_SEARCHES_KEY, RECENT_SEARCHES_LIMIT};
pub use session::{Session, SessionSettings};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use watchlist::{WatchlistStore, WATCHLIST_KEY};
