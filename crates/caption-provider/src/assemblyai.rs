//! AssemblyAI implementation of [`TranscriptionProvider`].
//!
//! Three-call flow against the v2 REST API:
//!
//! 1. `POST /v2/upload` — raw bytes of a local file, returns an
//!    `upload_url` (skipped for remote-URL sources).
//! 2. `POST /v2/transcript` — submits the audio URL, returns the
//!    provider-assigned transcript id without blocking on completion.
//! 3. `GET /v2/transcript/{id}` — current status plus, when completed,
//!    the word-level timestamps.
//!
//! All requests carry the account API key in the `authorization` header.

use async_trait::async_trait;
use caption_core::Word;
use serde::Deserialize;
use tracing::{debug, info};

use crate::provider::{
    ProviderError, ProviderResult, ProviderStatus, TranscriptSource, TranscriptionConfig,
    TranscriptionProvider,
};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Response of `POST /v2/upload`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Response of `POST /v2/transcript`.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

/// Response of `GET /v2/transcript/{id}`.
///
/// `words` and `error` are only populated in the `completed` and `error`
/// states respectively.
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    status: String,
    #[serde(default)]
    words: Option<Vec<Word>>,
    #[serde(default)]
    error: Option<String>,
}

/// AssemblyAI-backed transcription provider.
pub struct AssemblyAiProvider {
    /// HTTP client (reused across requests).
    client: reqwest::Client,
    /// API base URL (overridable for tests).
    base_url: String,
    /// Account API key.
    api_key: String,
}

impl AssemblyAiProvider {
    /// Create a provider against the production API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom base URL.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Upload a local file's bytes, returning the provider-hosted URL.
    async fn upload_file(&self, path: &std::path::Path) -> ProviderResult<String> {
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = bytes.len(), "uploading local file");

        let response = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        let response = check_status(response).await?;

        let data: UploadResponse = response.json().await?;
        Ok(data.upload_url)
    }
}

/// Map non-success responses to [`ProviderError::Api`].
async fn check_status(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiProvider {
    async fn submit(
        &self,
        source: &TranscriptSource,
        config: &TranscriptionConfig,
    ) -> ProviderResult<String> {
        let audio_url = match source {
            TranscriptSource::LocalFile(path) => self.upload_file(path).await?,
            TranscriptSource::RemoteUrl(url) => url.clone(),
        };

        let body = serde_json::json!({
            "audio_url": audio_url,
            "language_code": config.language,
            "punctuate": config.punctuate,
            "format_text": config.format_text,
        });

        let response = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let data: SubmitResponse = response.json().await?;
        info!(transcript_id = %data.id, "transcription submitted");
        Ok(data.id)
    }

    async fn get_status(&self, job_id: &str) -> ProviderResult<ProviderStatus> {
        let response = self
            .client
            .get(format!("{}/v2/transcript/{job_id}", self.base_url))
            .header("authorization", &self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;

        let data: TranscriptResponse = response.json().await?;
        let status = match data.status.as_str() {
            "completed" => ProviderStatus::Completed {
                words: data.words.unwrap_or_default(),
            },
            "error" => ProviderStatus::Failed {
                error: data
                    .error
                    .unwrap_or_else(|| "transcription failed".to_owned()),
            },
            // "queued", "processing", and anything unrecognized
            other => {
                debug!(transcript_id = %job_id, status = %other, "transcript still in progress");
                ProviderStatus::Processing
            }
        };
        Ok(status)
    }
}
