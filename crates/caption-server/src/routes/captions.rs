//! `POST /api/captions/transcribe` and `GET /api/captions/transcribe/{job_id}`.

use axum::extract::{Path, State};
use axum::response::Json;
use caption_core::{ApiError, CaptionFile, JobStatus};
use caption_provider::{TranscriptSource, TranscriptionConfig};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::HttpResult;
use crate::jobs::{poll_job, PollOutcome};
use crate::server::AppState;

/// Request body for starting a transcription.
///
/// Exactly one of `video_id` (an uploaded video) or `video_url` (a remote
/// source the provider fetches itself) must be supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionRequest {
    /// Id of a previously uploaded video.
    #[serde(default)]
    pub video_id: Option<String>,
    /// Remote video URL.
    #[serde(default)]
    pub video_url: Option<String>,
    /// Requested caption language tag (default `"en"`).
    #[serde(default)]
    pub language: Option<String>,
}

/// Response body for both submission and polling.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResponse {
    /// Current job status.
    pub status: JobStatus,
    /// Provider-assigned job id.
    pub job_id: String,
    /// Caption file, present once the job completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions: Option<CaptionFile>,
    /// Human-readable progress or error message.
    pub message: String,
}

/// Submit a transcription job for an uploaded video or a remote URL.
///
/// Submission is non-blocking: the provider returns its job id
/// immediately and the caller polls for the result.
#[instrument(skip(state, request))]
pub async fn transcribe(
    State(state): State<AppState>,
    Json(request): Json<TranscriptionRequest>,
) -> HttpResult<Json<TranscriptionResponse>> {
    let source = match (&request.video_id, &request.video_url) {
        (Some(video_id), _) => {
            let path = state.uploads.path_for(video_id).ok_or_else(|| {
                ApiError::not_found(format!("video '{video_id}' not found"))
            })?;
            TranscriptSource::LocalFile(path)
        }
        (None, Some(url)) => TranscriptSource::RemoteUrl(url.clone()),
        (None, None) => {
            return Err(ApiError::invalid_request(
                "either video_id (for an uploaded video) or video_url is required",
            )
            .into())
        }
    };

    // Provider-side language detection stays on; the requested language
    // only tags the resulting caption file.
    let config = TranscriptionConfig::default();
    let job_id = state
        .provider
        .submit(&source, &config)
        .await
        .map_err(|e| ApiError::provider(format!("failed to start transcription: {e}")))?;

    let language = request.language.unwrap_or_else(|| "en".to_owned());
    state.jobs.insert(job_id.clone(), source, language);

    Ok(Json(TranscriptionResponse {
        status: JobStatus::Processing,
        job_id,
        captions: None,
        message: "transcription started".into(),
    }))
}

/// Poll a transcription job.
///
/// Always answers at the transport level: provider failures during
/// polling surface as an `error`-status body, never as an HTTP error.
#[instrument(skip(state))]
pub async fn poll(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HttpResult<Json<TranscriptionResponse>> {
    let outcome = poll_job(&state.jobs, state.provider.as_ref(), &job_id).await?;

    let response = match outcome {
        PollOutcome::Processing => TranscriptionResponse {
            status: JobStatus::Processing,
            job_id,
            captions: None,
            message: "transcription is still in progress".into(),
        },
        PollOutcome::Completed(captions) => TranscriptionResponse {
            status: JobStatus::Completed,
            job_id,
            captions: Some(captions),
            message: "transcription completed successfully".into(),
        },
        PollOutcome::Error(error) => TranscriptionResponse {
            status: JobStatus::Error,
            job_id,
            captions: None,
            message: format!("transcription failed: {error}"),
        },
    };
    Ok(Json(response))
}
