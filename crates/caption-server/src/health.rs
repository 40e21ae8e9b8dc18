//! `/api/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Jobs currently in the `processing` state.
    pub active_jobs: usize,
}

/// Build a health response from live counters.
#[must_use]
pub fn health_check(start_time: Instant, active_jobs: usize) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        active_jobs,
    }
}
