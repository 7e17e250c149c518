//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body for deleting a background image by its URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImageRequest {
    /// The object-store URL identifying the image.
    pub url: String,
}
