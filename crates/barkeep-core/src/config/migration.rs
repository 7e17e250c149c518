//! Legacy-data migration gate configuration.

use serde::{Deserialize, Serialize};

/// Migration gate configuration.
///
/// Points at the JSON exports of the legacy local data. Missing files are
/// treated as "nothing to migrate".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Path to the legacy staff-user export.
    #[serde(default = "default_users_path")]
    pub legacy_users_path: String,
    /// Path to the legacy maintenance-ticket export.
    #[serde(default = "default_tickets_path")]
    pub legacy_tickets_path: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            legacy_users_path: default_users_path(),
            legacy_tickets_path: default_tickets_path(),
        }
    }
}

fn default_users_path() -> String {
    "data/legacy/users.json".to_string()
}

fn default_tickets_path() -> String {
    "data/legacy/tickets.json".to_string()
}
