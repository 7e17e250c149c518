//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for locally stored objects.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Public base URL under which stored objects are served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Key prefix for background image objects.
    #[serde(default = "default_images_prefix")]
    pub images_prefix: String,
    /// Maximum accepted image upload size in bytes (default 10 MB).
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            public_base_url: default_public_base_url(),
            images_prefix: default_images_prefix(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_data_root() -> String {
    "data/objects".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/objects".to_string()
}

fn default_images_prefix() -> String {
    "backgrounds".to_string()
}

fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}
