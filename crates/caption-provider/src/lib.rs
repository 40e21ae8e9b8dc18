//! # caption-provider
//!
//! The external transcription provider boundary:
//!
//! - [`TranscriptionProvider`]: async trait the server depends on — submit
//!   a source, poll a job id. The provider is a black box; it performs the
//!   actual speech-to-text work.
//! - [`AssemblyAiProvider`]: reqwest-backed implementation against the
//!   AssemblyAI v2 REST API.

#![deny(unsafe_code)]

pub mod assemblyai;
pub mod provider;

pub use assemblyai::AssemblyAiProvider;
pub use provider::{
    ProviderError, ProviderResult, ProviderStatus, TranscriptSource, TranscriptionConfig,
    TranscriptionProvider,
};
