//! The [`TranscriptionProvider`] trait and its supporting types.

use std::path::PathBuf;

use async_trait::async_trait;
use caption_core::Word;

/// Where the audio/video to transcribe comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSource {
    /// A file stored locally by the upload store.
    LocalFile(PathBuf),
    /// A remote URL the provider fetches itself.
    RemoteUrl(String),
}

/// Per-submission transcription options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    /// Requested language code, `None` for provider-side detection.
    pub language: Option<String>,
    /// Ask the provider to punctuate the transcript.
    pub punctuate: bool,
    /// Ask the provider to apply casing/formatting to the text.
    pub format_text: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: None,
            punctuate: true,
            format_text: true,
        }
    }
}

/// Current provider-side verdict for a submitted transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Queued or actively transcribing.
    Processing,
    /// Finished; the full ordered word sequence is available.
    Completed {
        /// Timestamped words, ordered by start time.
        words: Vec<Word>,
    },
    /// The provider gave up on this transcript.
    Failed {
        /// Provider-supplied failure message.
        error: String,
    },
}

/// Errors from the provider boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Local file could not be read for upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// The external speech-to-text service.
///
/// `submit` is non-blocking: it returns a provider-assigned job id
/// immediately, and completion is detected by polling `get_status`.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Submit a source for transcription; returns the provider job id.
    async fn submit(
        &self,
        source: &TranscriptSource,
        config: &TranscriptionConfig,
    ) -> ProviderResult<String>;

    /// Fetch the current status of a submitted transcript.
    async fn get_status(&self, job_id: &str) -> ProviderResult<ProviderStatus>;
}
