use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::title::Title;

/// Playback progress for one title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub title_id: String,
    /// Snapshot of the title at the time of the last save, so the history can be
    /// rendered without the catalog being loaded.
    pub title: Title,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub updated_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Watched share in percent, clamped to `[0, 100]`.
    pub fn progress_percent(&self) -> f64 {
        if !(self.duration_seconds > 0.0) {
            return 0.0;
        }
        let percent = 100.0 * self.position_seconds / self.duration_seconds;
        if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        }
    }
}
