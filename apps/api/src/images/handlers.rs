use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use image::ImageFormat;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Request body cap for the upload route; leaves room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

const KEY_PREFIX: &str = "images";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub url: String,
}

/// POST /images
/// Multipart upload; the image is read from the `file` field.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await.map_err(multipart_error)?);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| AppError::Validation("A 'file' field is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(
            "Images must be 5 MiB or smaller".to_string(),
        ));
    }

    let (content_type, ext) = sniff_image(&bytes).ok_or_else(|| {
        AppError::Validation("Only PNG, JPEG, GIF and WebP images are accepted".to_string())
    })?;

    let file_name = format!("{}.{ext}", Uuid::new_v4());
    let key = format!("{KEY_PREFIX}/{file_name}");
    let size = bytes.len();
    state.blobs.put(&key, bytes, content_type).await?;
    let url = state.blobs.url(&key).await?;

    info!(key = %key, bytes = size, content_type, "Image uploaded");
    Ok(Json(UploadResponse { file_name, url }))
}

/// DELETE /images/:file_name
pub async fn handle_delete_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<StatusCode, AppError> {
    if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
        return Err(AppError::Validation(format!("Invalid file name: {file_name}")));
    }

    let key = format!("{KEY_PREFIX}/{file_name}");
    if !state.blobs.delete(&key).await? {
        return Err(AppError::NotFound(format!("Image {file_name} not found")));
    }
    info!(key = %key, "Image deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Content type and extension from the file's magic bytes. The client's
/// declared type is not trusted.
fn sniff_image(bytes: &[u8]) -> Option<(&'static str, &'static str)> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some(("image/png", "png")),
        ImageFormat::Jpeg => Some(("image/jpeg", "jpg")),
        ImageFormat::Gif => Some(("image/gif", "gif")),
        ImageFormat::WebP => Some(("image/webp", "webp")),
        _ => None,
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Images must be 5 MiB or smaller".to_string())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}
