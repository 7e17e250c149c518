//! Background image list repository implementation.

use sqlx::PgPool;

use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;
use barkeep_entity::image::BackgroundImage;

/// Repository for the app-wide background image list.
///
/// The object-store URL is the primary key; there is no persisted order
/// beyond insertion time and no update-in-place.
#[derive(Debug, Clone)]
pub struct BackgroundImageRepository {
    pool: PgPool,
}

impl BackgroundImageRepository {
    /// Create a new background image repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a URL to the image list.
    pub async fn append(&self, url: &str) -> AppResult<BackgroundImage> {
        sqlx::query_as::<_, BackgroundImage>(
            "INSERT INTO background_images (url) VALUES ($1) RETURNING *",
        )
        .bind(url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append image", e))
    }

    /// Remove a URL from the image list. Returns `true` if a row was removed.
    pub async fn remove(&self, url: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM background_images WHERE url = $1")
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove image", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// List all images in upload order.
    pub async fn list(&self) -> AppResult<Vec<BackgroundImage>> {
        sqlx::query_as::<_, BackgroundImage>(
            "SELECT * FROM background_images ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list images", e))
    }
}
