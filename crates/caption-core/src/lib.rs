//! # caption-core
//!
//! Domain types and pure logic shared across the caption server:
//!
//! - `Word`, `CaptionSegment`, `CaptionFile`: the transcription data model
//! - `segmenter`: word-to-segment grouping for subtitle rendering
//! - `errors`: the API error taxonomy with machine-readable codes
//!
//! No I/O and no async — everything here is synchronous and testable in
//! isolation.

#![deny(unsafe_code)]

pub mod errors;
pub mod segmenter;
pub mod types;

pub use errors::ApiError;
pub use segmenter::segment_words;
pub use types::{CaptionFile, CaptionSegment, JobStatus, Word};
