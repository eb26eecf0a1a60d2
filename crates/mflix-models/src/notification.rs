use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "{}", name)
    }
}

/// A transient, advisory message for the user (toast).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}
