//! Background image entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A banner background image.
///
/// The object-store URL is the identity; there are no other attributes and
/// no update-in-place. The row exists only to keep the app-wide image list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BackgroundImage {
    /// Public object-store URL, used directly as the unique key.
    pub url: String,
    /// When the image was uploaded.
    pub created_at: DateTime<Utc>,
}
