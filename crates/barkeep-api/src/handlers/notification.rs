//! Notification handlers.
//!
//! Reads and acknowledgements go through the session's notification
//! center; the POST endpoint is the producer side, writing straight to
//! the store (the insert event comes back through the change feed).

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use barkeep_entity::notification::Notification;
use barkeep_store::NewNotification;

use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    state.require_migrated()?;
    Ok(Json(ApiResponse::ok(state.center.notifications().await)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    state.require_migrated()?;
    let count = state.center.unread_count().await as i64;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.require_migrated()?;
    state.center.mark_as_read(id).await;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Marked as read".to_string(),
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.require_migrated()?;
    state.center.mark_all_as_read().await;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Marked all as read".to_string(),
    })))
}

/// POST /api/notifications — producer side
pub async fn create_notification(
    State(state): State<AppState>,
    Json(req): Json<NewNotification>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    state.require_migrated()?;
    let row = state.notifications.insert(req).await?;
    Ok(Json(ApiResponse::ok(row)))
}
