//! `POST /api/videos/upload` — multipart video upload.

use axum::extract::{Multipart, State};
use axum::response::Json;
use caption_core::ApiError;
use serde::Serialize;
use tracing::instrument;

use crate::error::HttpResult;
use crate::server::AppState;

/// Response body for a stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct VideoUploadResponse {
    /// Opaque id usable as a transcription source.
    pub video_id: String,
    /// Original client filename.
    pub filename: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Human-readable confirmation.
    pub message: String,
}

/// Accept a multipart upload (field `file`) and store it.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HttpResult<Json<VideoUploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(ToOwned::to_owned).unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_request(format!("failed to read upload: {e}")))?;

        let video = state.uploads.save(&filename, &bytes)?;
        return Ok(Json(VideoUploadResponse {
            message: format!(
                "video '{}' uploaded successfully; ready for transcription",
                video.filename
            ),
            video_id: video.video_id,
            filename: video.filename,
            size: video.size,
        }));
    }

    Err(ApiError::invalid_request("missing multipart field 'file'").into())
}
