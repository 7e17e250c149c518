//! Staff user repository implementation.

use sqlx::PgPool;

use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;
use barkeep_entity::user::StaffRole;

/// Repository for staff user rows.
#[derive(Debug, Clone)]
pub struct StaffUserRepository {
    pool: PgPool,
}

impl StaffUserRepository {
    /// Create a new staff user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether any staff users exist at all (migration marker).
    pub async fn any_exist(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM staff_users)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check staff users", e)
            })
    }

    /// Upsert a user by username; existing rows are left untouched.
    ///
    /// Returns `true` if a row was inserted.
    pub async fn upsert_by_username(
        &self,
        username: &str,
        display_name: &str,
        role: StaffRole,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO staff_users (username, display_name, role) \
             VALUES ($1, $2, $3) ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(display_name)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert staff user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
