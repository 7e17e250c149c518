//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use barkeep_core::config::AppConfig;
use barkeep_core::error::AppError;
use barkeep_core::result::AppResult;
use barkeep_core::traits::object_store::ObjectStore;
use barkeep_entity::migration::{GateState, MigrationStatus};
use barkeep_storage::BackgroundImageManager;
use barkeep_store::NotificationStore;
use barkeep_sync::NotificationCenter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Object store backing background images.
    pub object_store: Arc<dyn ObjectStore>,
    /// Background image manager.
    pub images: Arc<BackgroundImageManager>,
    /// Notification store (producer and query side).
    pub notifications: Arc<dyn NotificationStore>,
    /// The notification center for this process's admin session.
    pub center: Arc<dyn NotificationCenter>,
    /// Terminal migration gate state for this session.
    pub migration_state: GateState,
    /// Migration status as observed when the gate ran.
    pub migration_status: MigrationStatus,
}

impl AppState {
    /// Guard for store-backed features that must not activate until the
    /// migration gate has completed.
    pub fn require_migrated(&self) -> AppResult<()> {
        if self.migration_state.is_completed() {
            Ok(())
        } else {
            Err(AppError::service_unavailable(
                "Store-backed features are unavailable until migration completes",
            ))
        }
    }
}
