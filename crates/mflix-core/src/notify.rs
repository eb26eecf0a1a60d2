use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mflix_config::NotificationConfig;
use mflix_models::{Notification, Severity};
use tokio::sync::broadcast;
use tracing::debug;

const BROADCAST_CAPACITY: usize = 16;

/// Transient toasts: bounded, oldest evicted first, each expiring on its own.
pub struct NotificationChannel {
    queue: VecDeque<Notification>,
    next_id: u64,
    max_visible: usize,
    dismiss_after: Duration,
    sender: broadcast::Sender<Notification>,
}

impl NotificationChannel {
    pub fn new(max_visible: usize, dismiss_after: Duration) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            queue: VecDeque::new(),
            next_id: 1,
            max_visible: max_visible.max(1),
            dismiss_after,
            sender,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.max_visible, Duration::from_millis(config.dismiss_after_ms))
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.notify_at(message, severity, Utc::now())
    }

    pub fn notify_at(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
        };
        debug!(id, %severity, "Notification: {}", notification.message);

        while self.queue.len() >= self.max_visible {
            self.queue.pop_front();
        }
        self.queue.push_back(notification.clone());

        // No subscribers is fine
        let _ = self.sender.send(notification);
        id
    }

    pub fn visible(&mut self) -> Vec<Notification> {
        self.visible_at(Utc::now())
    }

    /// Notifications still on screen at `now`, oldest first. Expired ones are dropped.
    pub fn visible_at(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        if let Ok(ttl) = chrono::Duration::from_std(self.dismiss_after) {
            self.queue
                .retain(|n| n.created_at.checked_add_signed(ttl).map_or(true, |expires| expires > now));
        }
        self.queue.iter().cloned().collect()
    }

    /// Returns whether the notification was still queued.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(list: &[Notification]) -> Vec<&str> {
        list.iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn test_oldest_evicted_beyond_max_visible() {
        let mut channel = NotificationChannel::default();
        let now = Utc::now();
        for i in 1..=4 {
            channel.notify_at(format!("n{}", i), Severity::Info, now);
        }
        assert_eq!(messages(&channel.visible_at(now)), vec!["n2", "n3", "n4"]);
    }

    #[test]
    fn test_expiry_after_dismiss_window() {
        let mut channel = NotificationChannel::new(3, Duration::from_millis(3200));
        let start = Utc::now();
        channel.notify_at("first", Severity::Success, start);
        channel.notify_at("second", Severity::Error, start + chrono::Duration::milliseconds(2000));

        let later = start + chrono::Duration::milliseconds(3199);
        assert_eq!(messages(&channel.visible_at(later)), vec!["first", "second"]);

        let expired = start + chrono::Duration::milliseconds(3200);
        assert_eq!(messages(&channel.visible_at(expired)), vec!["second"]);

        let all_gone = start + chrono::Duration::milliseconds(5300);
        assert!(channel.visible_at(all_gone).is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_dismissable() {
        let mut channel = NotificationChannel::default();
        let a = channel.notify("a", Severity::Info);
        let b = channel.notify("b", Severity::Warning);
        assert_ne!(a, b);

        assert!(channel.dismiss(a));
        assert!(!channel.dismiss(a));
        assert_eq!(messages(&channel.visible()), vec!["b"]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_notifications() {
        let mut channel = NotificationChannel::default();
        let mut rx = channel.subscribe();

        let id = channel.notify("✓ Added to My List", Severity::Success);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, id);
        assert_eq!(received.severity, Severity::Success);
    }
}
