//! Maintenance ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bar maintenance ticket carried over from the legacy portal.
///
/// `legacy_key` is the natural key from the old system; the migration gate
/// upserts by it so repeated runs never duplicate tickets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceTicket {
    /// Unique ticket identifier.
    pub id: Uuid,
    /// Natural key from the legacy system.
    pub legacy_key: String,
    /// Short summary of the issue.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Current status (open, in_progress, closed).
    pub status: String,
    /// When the ticket record was created.
    pub created_at: DateTime<Utc>,
}
