//! Database schema migration runner.
//!
//! Not to be confused with the legacy-data [`MigrationGate`]
//! (`crate::migration`); this runs the SQL schema migrations embedded from
//! the workspace `migrations/` directory.
//!
//! [`MigrationGate`]: crate::migration::MigrationGate

use sqlx::PgPool;
use tracing::info;

use barkeep_core::error::{AppError, ErrorKind};

/// Run all pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running schema migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Schema migrations completed successfully");
    Ok(())
}
