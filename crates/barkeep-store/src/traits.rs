//! Trait seams for the realtime data store boundary.
//!
//! The store is a black-box collaborator: a row store with query,
//! update-by-id(-set), and insert-event subscription capabilities.
//! Postgres implementations live in this crate; in-memory doubles for
//! tests live in [`crate::memory`].

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use barkeep_core::result::AppResult;
use barkeep_entity::notification::{Notification, NotificationKind};
use barkeep_entity::user::StaffRole;

/// Fields of a notification to be inserted by a producer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewNotification {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Severity/kind tag.
    #[serde(default)]
    pub kind: NotificationKind,
    /// The role the notification targets.
    pub recipient_role: StaffRole,
}

/// Query and mutation capability over the notifications table.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the latest notifications for a role, newest first.
    async fn fetch_latest(&self, role: StaffRole, limit: u32) -> AppResult<Vec<Notification>>;

    /// Count unread notifications for a role.
    async fn count_unread(&self, role: StaffRole) -> AppResult<i64>;

    /// Set `read = true` on a single row.
    async fn mark_read(&self, id: Uuid) -> AppResult<()>;

    /// Set `read = true` on a set of rows in one batched update.
    ///
    /// Returns the number of rows affected.
    async fn mark_read_many(&self, ids: &[Uuid]) -> AppResult<u64>;

    /// Insert a new notification row (producer side).
    async fn insert(&self, new: NewNotification) -> AppResult<Notification>;
}

/// Insert-event subscription capability.
///
/// Subscriptions are keyed by (table = notifications, event = insert,
/// filter = recipient role). Update and delete events are deliberately not
/// carried by the feed.
#[async_trait]
pub trait ChangeFeed: Send + Sync + std::fmt::Debug + 'static {
    /// Subscribe to committed inserts targeting the given role.
    ///
    /// The receiver sees every matching insert, including rows inserted by
    /// the subscribing session itself. Dropping the receiver releases the
    /// subscription.
    async fn subscribe(&self, role: StaffRole) -> AppResult<broadcast::Receiver<Notification>>;
}
