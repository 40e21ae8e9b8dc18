//! # caption-server
//!
//! Axum HTTP server mediating between upload clients and the external
//! transcription provider.
//!
//! - HTTP endpoints: video upload, transcription submit/poll, health
//! - Job registry: in-memory, mutex-guarded job state machine
//!   (`processing` → `completed` | `error`, both terminal)
//! - Upload store: temp-dir backed video files keyed by opaque ids
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`
//!
//! Jobs live in process memory only and are lost on restart by design.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod health;
pub mod jobs;
pub mod routes;
pub mod server;
pub mod uploads;
