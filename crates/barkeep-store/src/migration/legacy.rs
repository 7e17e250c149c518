//! Legacy data exports from the old portal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use barkeep_core::config::migration::MigrationConfig;
use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;

/// A staff account as exported by the legacy portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUser {
    /// Login name; the natural key.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Role string; unknown values fall back to bartender.
    #[serde(default)]
    pub role: String,
}

/// A maintenance ticket as exported by the legacy portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyTicket {
    /// Natural key from the legacy system.
    pub key: String,
    /// Short summary.
    pub title: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Status string.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "open".to_string()
}

/// Source of legacy data to be migrated.
#[async_trait]
pub trait LegacySource: Send + Sync + std::fmt::Debug + 'static {
    /// Load the legacy staff accounts.
    async fn load_users(&self) -> AppResult<Vec<LegacyUser>>;

    /// Load the legacy maintenance tickets.
    async fn load_tickets(&self) -> AppResult<Vec<LegacyTicket>>;
}

/// Legacy source reading the JSON export files named in the configuration.
///
/// A missing file means there is nothing to migrate, not an error.
#[derive(Debug, Clone)]
pub struct JsonLegacySource {
    users_path: String,
    tickets_path: String,
}

impl JsonLegacySource {
    /// Create a source from migration configuration.
    pub fn new(config: &MigrationConfig) -> Self {
        Self {
            users_path: config.legacy_users_path.clone(),
            tickets_path: config.legacy_tickets_path.clone(),
        }
    }

    async fn load<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let data = match tokio::fs::read(path).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path, "Legacy export not present, nothing to migrate");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read legacy export: {path}"),
                    e,
                ));
            }
        };
        serde_json::from_slice(&data).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to parse legacy export: {path}"),
                e,
            )
        })
    }
}

#[async_trait]
impl LegacySource for JsonLegacySource {
    async fn load_users(&self) -> AppResult<Vec<LegacyUser>> {
        self.load(&self.users_path).await
    }

    async fn load_tickets(&self) -> AppResult<Vec<LegacyTicket>> {
        self.load(&self.tickets_path).await
    }
}
