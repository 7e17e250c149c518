//! Realtime change-feed and notification projection configuration.

use serde::{Deserialize, Serialize};

/// Realtime change-feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Postgres NOTIFY channel the insert trigger publishes on.
    #[serde(default = "default_notify_channel")]
    pub notify_channel: String,
    /// Internal buffer size for the broadcast fan-out channels.
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer_size: usize,
    /// Number of notifications fetched on initial load.
    #[serde(default = "default_initial_fetch")]
    pub initial_fetch_limit: u32,
    /// Maximum entries retained in a live projection; oldest are dropped
    /// once live inserts push the projection past this size.
    #[serde(default = "default_projection_cap")]
    pub projection_cap: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            notify_channel: default_notify_channel(),
            feed_buffer_size: default_feed_buffer(),
            initial_fetch_limit: default_initial_fetch(),
            projection_cap: default_projection_cap(),
        }
    }
}

fn default_notify_channel() -> String {
    "barkeep_notifications".to_string()
}

fn default_feed_buffer() -> usize {
    256
}

fn default_initial_fetch() -> u32 {
    20
}

fn default_projection_cap() -> usize {
    50
}
