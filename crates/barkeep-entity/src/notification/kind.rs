//! Notification category tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity/kind tag attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Informational message.
    Info,
    /// A completed action (e.g., a test passed, a migration finished).
    Success,
    /// Something needs attention soon.
    Warning,
    /// Something failed.
    Error,
}

impl NotificationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::Info
    }
}
