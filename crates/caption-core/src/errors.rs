//! API error taxonomy.
//!
//! Typed errors with machine-readable codes, replacing string matching at
//! the HTTP boundary. No automatic retries anywhere — retry decisions
//! belong to the caller.

use serde::{Deserialize, Serialize};

// ── Error code constants ────────────────────────────────────────────

/// Caller supplied an invalid or incomplete request.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
/// Referenced video or job is unknown.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// The external transcription provider failed.
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Error type returned by the caption API core.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing source, unsupported video extension, missing filename, and
    /// similar caller mistakes. Surfaced immediately, never retried.
    #[error("{message}")]
    InvalidRequest {
        /// Description of what is wrong.
        message: String,
    },

    /// Referenced video id or job id is unknown.
    #[error("{message}")]
    NotFound {
        /// Human-readable message naming the missing resource.
        message: String,
    },

    /// The provider's submission or status call failed, or the provider
    /// reported a transcription failure.
    #[error("{message}")]
    Provider {
        /// Provider-supplied or transport-level error message.
        message: String,
    },

    /// Unexpected server-side fault (I/O, body handling).
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },
}

impl ApiError {
    /// Invalid request.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Unknown resource.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Provider failure.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Internal fault.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Machine-readable error code for this variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => INVALID_REQUEST,
            Self::NotFound { .. } => NOT_FOUND,
            Self::Provider { .. } => PROVIDER_ERROR,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// Convert to the wire-format error body.
    #[must_use]
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_owned(),
            message: self.to_string(),
        }
    }
}

/// Error body sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
