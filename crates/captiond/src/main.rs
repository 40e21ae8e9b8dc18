//! # captiond
//!
//! Caption transcription API server binary — wires the AssemblyAI provider
//! into the HTTP server and runs until interrupted.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use caption_provider::assemblyai::DEFAULT_BASE_URL;
use caption_provider::AssemblyAiProvider;
use caption_server::config::ServerConfig;
use caption_server::server::CaptionServer;

/// Caption transcription API server.
#[derive(Parser, Debug)]
#[command(name = "captiond", about = "Caption transcription API server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "8000")]
    port: u16,

    /// AssemblyAI API key (falls back to the ASSEMBLYAI_API_KEY env var).
    #[arg(long)]
    api_key: Option<String>,

    /// Transcription provider base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    provider_url: String,

    /// Browser origin allowed by CORS.
    #[arg(long, default_value = "http://localhost:3000")]
    allowed_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let api_key = args
        .api_key
        .or_else(|| std::env::var("ASSEMBLYAI_API_KEY").ok())
        .context("no provider API key: pass --api-key or set ASSEMBLYAI_API_KEY")?;

    let provider = Arc::new(AssemblyAiProvider::with_base_url(api_key, args.provider_url));
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        allowed_origin: Some(args.allowed_origin),
        ..ServerConfig::default()
    };

    let server =
        CaptionServer::new(config, provider).context("failed to create upload directory")?;
    let (addr, handle) = server.listen().await.context("failed to bind")?;
    info!(%addr, "ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown signal received");
    server.shutdown();
    handle.await.context("server task failed")?;

    Ok(())
}
