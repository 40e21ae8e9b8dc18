//! Core types for the transcription data model.

use serde::{Deserialize, Serialize};

/// A single transcribed token as returned by the transcription provider.
///
/// Timestamps are integer milliseconds with `start <= end`. Word sequences
/// arrive ordered by start time; neither property is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// The token text.
    pub text: String,
    /// Start time in milliseconds.
    pub start: u64,
    /// End time in milliseconds.
    pub end: u64,
}

impl Word {
    /// Convenience constructor.
    #[must_use]
    pub fn new(text: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A contiguous run of words grouped into one caption unit.
///
/// Times are in seconds (millisecond timestamps divided by 1000.0).
/// Within one [`CaptionFile`], ids are 1-based sequence numbers assigned in
/// emission order and segments are non-overlapping and ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// 1-based sequence number within the caption file.
    pub id: u32,
    /// Segment start in seconds.
    pub start_time: f64,
    /// Segment end in seconds.
    pub end_time: f64,
    /// Space-joined text of the constituent words.
    pub text: String,
}

/// An ordered sequence of caption segments plus file-level metadata.
///
/// `language` and `format` are metadata tags only — they are not validated
/// against the actual content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFile {
    /// Ordered caption segments.
    pub segments: Vec<CaptionSegment>,
    /// Language tag (default `"en"`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Format tag (default `"vtt"`).
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_format() -> String {
    "vtt".to_owned()
}

impl CaptionFile {
    /// Build a caption file from segments with the given language tag.
    #[must_use]
    pub fn new(segments: Vec<CaptionSegment>, language: impl Into<String>) -> Self {
        Self {
            segments,
            language: language.into(),
            format: default_format(),
        }
    }
}

/// Lifecycle status of a transcription job.
///
/// `Processing` is the only non-terminal state; a job transitions exactly
/// once to `Completed` or `Error` and never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, provider result not yet available.
    Processing,
    /// Provider finished; captions are cached.
    Completed,
    /// Provider reported a transcription failure.
    Error,
}

impl JobStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}
