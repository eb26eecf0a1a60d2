use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mflix_models::Title;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::history::WatchHistoryStore;

/// History store shared between the session and background save tasks.
pub type SharedHistory = Arc<Mutex<WatchHistoryStore>>;

pub(crate) fn lock_history(history: &SharedHistory) -> MutexGuard<'_, WatchHistoryStore> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Debounces playback position saves per title.
///
/// Each tick replaces the pending save for that title, so at most one save per
/// title is waiting at any time. Pending saves run on the tokio runtime the
/// saver is used from.
pub struct ProgressSaver {
    history: SharedHistory,
    debounce: Duration,
    pending: HashMap<String, JoinHandle<()>>,
}

impl ProgressSaver {
    pub fn new(history: SharedHistory, debounce: Duration) -> Self {
        Self {
            history,
            debounce,
            pending: HashMap::new(),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Schedule a save of the current position, replacing any pending one.
    pub fn on_tick(&mut self, title: &Title, position_seconds: f64, duration_seconds: f64) {
        if let Some(previous) = self.pending.remove(&title.id) {
            previous.abort();
            trace!(title_id = %title.id, "Rescheduled progress save");
        }

        let history = Arc::clone(&self.history);
        let debounce = self.debounce;
        let title = title.clone();
        let title_id = title.id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            lock_history(&history).save_progress(&title, position_seconds, duration_seconds);
            debug!(title_id = %title.id, position_seconds, "Saved playback progress");
        });
        self.pending.insert(title_id, handle);
    }

    /// Drop the pending save for a title without writing it.
    pub fn cancel(&mut self, title_id: &str) -> bool {
        match self.pending.remove(title_id) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    pub fn pending_count(&mut self) -> usize {
        self.pending.retain(|_, handle| !handle.is_finished());
        self.pending.len()
    }
}

impl Drop for ProgressSaver {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::title;

    fn shared_history() -> SharedHistory {
        Arc::new(Mutex::new(WatchHistoryStore::load(Arc::new(MemoryStorage::new()))))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_coalesce_into_one_save() {
        let history = shared_history();
        let mut saver = ProgressSaver::new(history.clone(), Duration::from_secs(5));
        let alpha = title("a", "Alpha");

        saver.on_tick(&alpha, 1.0, 100.0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        saver.on_tick(&alpha, 3.0, 100.0);
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(lock_history(&history).is_empty(), "debounce window restarted");
        assert_eq!(saver.pending_count(), 1);

        saver.on_tick(&alpha, 7.0, 100.0);
        tokio::time::sleep(Duration::from_secs(6)).await;

        let store = lock_history(&history);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().position_seconds, 7.0);
        drop(store);
        assert_eq!(saver.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_titles_debounce_independently() {
        let history = shared_history();
        let mut saver = ProgressSaver::new(history.clone(), Duration::from_secs(5));

        saver.on_tick(&title("a", "Alpha"), 10.0, 100.0);
        saver.on_tick(&title("b", "Beta"), 20.0, 100.0);
        assert_eq!(saver.pending_count(), 2);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(lock_history(&history).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_does_not_flush() {
        let history = shared_history();
        let mut saver = ProgressSaver::new(history.clone(), Duration::from_secs(5));

        saver.on_tick(&title("a", "Alpha"), 10.0, 100.0);
        saver.on_tick(&title("b", "Beta"), 20.0, 100.0);
        assert!(saver.cancel("a"));
        assert!(!saver.cancel("a"));

        tokio::time::sleep(Duration::from_secs(6)).await;
        let store = lock_history(&history);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let history = shared_history();
        let mut saver = ProgressSaver::new(history.clone(), Duration::from_secs(5));

        saver.on_tick(&title("a", "Alpha"), 10.0, 100.0);
        saver.on_tick(&title("b", "Beta"), 20.0, 100.0);
        saver.cancel_all();
        assert_eq!(saver.pending_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(lock_history(&history).is_empty());
    }
}
