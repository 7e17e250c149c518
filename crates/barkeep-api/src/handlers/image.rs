//! Background image handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;

use barkeep_core::error::AppError;
use barkeep_entity::image::BackgroundImage;

use crate::dto::request::DeleteImageRequest;
use crate::dto::response::{ApiResponse, MessageResponse, UploadResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/images
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BackgroundImage>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.images.list().await?)))
}

/// POST /api/images — multipart upload, field `file`
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(String::from);
            content_type = field.content_type().map(String::from);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
            );
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("file is required"))?;
    let content_type = content_type.ok_or_else(|| AppError::validation("file content type is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let image = state.images.upload(&file_name, &content_type, data).await?;
    Ok(Json(ApiResponse::ok(UploadResponse { url: image.url })))
}

/// DELETE /api/images
pub async fn delete_image(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.images.delete(&req.url).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Image deleted".to_string(),
    })))
}
