//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the caption server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Browser origin allowed by CORS; `None` allows any origin.
    pub allowed_origin: Option<String>,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            allowed_origin: Some("http://localhost:3000".into()),
            max_upload_bytes: 256 * 1024 * 1024, // 256 MB
        }
    }
}
