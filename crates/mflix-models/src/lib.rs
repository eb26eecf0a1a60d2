pub mod notification;
pub mod raw_record;
pub mod title;
pub mod watch_history;
pub mod watchlist;

pub use notification::{Notification, Severity};
pub use raw_record::{RawRecord, IDENTIFIER_FIELDS};
pub use title::{CastMember, Episode, PlayableLink, Season, Title, TitleKind};
pub use watch_history::HistoryEntry;
pub use watchlist::WatchlistEntry;
