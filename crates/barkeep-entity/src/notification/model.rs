//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::role::StaffRole;

use super::kind::NotificationKind;

/// A notification row in the realtime data store.
///
/// Rows are created by external producers (the portal's admin actions,
/// test submissions, maintenance reports); this service observes them via
/// an initial fetch or a live insert event and only ever flips the `read`
/// flag. Once `read` is true it never reverts through the normal flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier, immutable once created.
    pub id: Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Severity/kind tag.
    pub kind: NotificationKind,
    /// Whether an admin has acknowledged this notification.
    pub read: bool,
    /// When the notification was created (immutable).
    pub created_at: DateTime<Utc>,
    /// The role this notification targets (immutable).
    pub recipient_role: StaffRole,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}
