use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership of one title in the personal watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub title_id: String,
    pub added_at: DateTime<Utc>,
}
