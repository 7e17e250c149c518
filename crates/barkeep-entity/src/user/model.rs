//! Staff user entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::StaffRole;

/// A staff member with portal access.
///
/// Staff users are created either through the admin panel or by the
/// migration gate copying legacy local accounts into the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name; the natural key the migration gate upserts by.
    pub username: String,
    /// Display name shown in the portal.
    pub display_name: String,
    /// The user's role.
    pub role: StaffRole,
    /// When the user record was created.
    pub created_at: DateTime<Utc>,
}
