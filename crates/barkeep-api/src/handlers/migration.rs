//! Migration gate status handler.

use axum::extract::State;
use axum::Json;

use crate::dto::response::{ApiResponse, MigrationStatusResponse};
use crate::state::AppState;

/// GET /api/migration/status
pub async fn status(State(state): State<AppState>) -> Json<ApiResponse<MigrationStatusResponse>> {
    Json(ApiResponse::ok(MigrationStatusResponse {
        state: state.migration_state,
        status: state.migration_status,
    }))
}
