//! `CaptionServer` — Axum HTTP server wiring state, routes, and shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderValue;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use caption_provider::TranscriptionProvider;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::jobs::JobRegistry;
use crate::routes::{captions, videos};
use crate::uploads::UploadStore;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Uploaded video files.
    pub uploads: Arc<UploadStore>,
    /// Transcription job registry.
    pub jobs: Arc<JobRegistry>,
    /// External transcription provider.
    pub provider: Arc<dyn TranscriptionProvider>,
    /// When the server started.
    pub start_time: Instant,
}

/// The caption API server.
pub struct CaptionServer {
    config: ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
}

impl CaptionServer {
    /// Create a new server over the given provider.
    ///
    /// Fails only if the upload temp directory cannot be created.
    pub fn new(
        config: ServerConfig,
        provider: Arc<dyn TranscriptionProvider>,
    ) -> std::io::Result<Self> {
        let state = AppState {
            uploads: Arc::new(UploadStore::new()?),
            jobs: Arc::new(JobRegistry::new()),
            provider,
            start_time: Instant::now(),
        };
        Ok(Self {
            config,
            state,
            shutdown: CancellationToken::new(),
        })
    }

    /// Build the Axum router with all routes and layers.
    pub fn router(&self) -> Router {
        let cors = match &self.config.allowed_origin {
            Some(origin) => match origin.parse::<HeaderValue>() {
                Ok(value) => CorsLayer::new()
                    .allow_origin(value)
                    .allow_methods(Any)
                    .allow_headers(Any),
                Err(_) => {
                    warn!(origin = %origin, "invalid CORS origin, allowing any");
                    CorsLayer::permissive()
                }
            },
            None => CorsLayer::permissive(),
        };

        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/videos/upload", post(videos::upload))
            .route("/api/captions/transcribe", post(captions::transcribe))
            .route("/api/captions/transcribe/{job_id}", get(captions::poll))
            .layer(DefaultBodyLimit::max(self.config.max_upload_bytes))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve; returns the bound address and the serve task.
    ///
    /// The task drains on [`CaptionServer::shutdown`].
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let token = self.shutdown.clone();

        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "server error");
            }
        });

        info!(%addr, "caption server listening");
        Ok((addr, handle))
    }

    /// Initiate graceful shutdown.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Whether a shutdown has been initiated.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared state (registry, upload store, provider).
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// GET /api/health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let active = state.jobs.active_jobs();
    Json(health::health_check(state.start_time, active))
}
