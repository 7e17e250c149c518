//! Maintenance ticket repository implementation.

use sqlx::PgPool;

use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;

/// Repository for maintenance ticket rows.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Create a new ticket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether any tickets exist at all (migration marker).
    pub async fn any_exist(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM maintenance_tickets)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check tickets", e))
    }

    /// Upsert a ticket by its legacy natural key; existing rows are left
    /// untouched. Returns `true` if a row was inserted.
    pub async fn upsert_by_legacy_key(
        &self,
        legacy_key: &str,
        title: &str,
        description: &str,
        status: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO maintenance_tickets (legacy_key, title, description, status) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (legacy_key) DO NOTHING",
        )
        .bind(legacy_key)
        .bind(title)
        .bind(description)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert ticket", e))?;
        Ok(result.rows_affected() > 0)
    }
}
