//! Temp-dir backed store for uploaded video files.
//!
//! Maps opaque `video_<uuid>` ids to files under a process-owned temporary
//! directory. The directory (and every stored file) is removed when the
//! store is dropped, so uploads never outlive the process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use caption_core::ApiError;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

/// Accepted video file extensions (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["mp4", "mov", "m4v"];

/// A stored upload, as returned by [`UploadStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedVideo {
    /// Opaque id usable as a transcription source.
    pub video_id: String,
    /// Original client filename.
    pub filename: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Path of the stored file.
    pub path: PathBuf,
}

/// In-memory upload registry over a temporary directory.
pub struct UploadStore {
    dir: tempfile::TempDir,
    files: RwLock<HashMap<String, UploadedVideo>>,
}

impl UploadStore {
    /// Create a store with a fresh temporary directory.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            files: RwLock::new(HashMap::new()),
        })
    }

    /// Validate and persist uploaded bytes; returns the stored record.
    ///
    /// Rejects missing filenames and extensions outside
    /// [`SUPPORTED_EXTENSIONS`] (case-insensitive) with `InvalidRequest`.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<UploadedVideo, ApiError> {
        if filename.is_empty() {
            return Err(ApiError::invalid_request("no filename provided"));
        }

        let ext = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let Some(ext) = ext.filter(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str())) else {
            return Err(ApiError::invalid_request(format!(
                "unsupported video format; supported formats: {}",
                SUPPORTED_EXTENSIONS
                    .map(|e| format!(".{e}"))
                    .join(", ")
            )));
        };

        let video_id = format!("video_{}", Uuid::new_v4());
        let path = self.dir.path().join(format!("{video_id}.{ext}"));
        std::fs::write(&path, bytes)
            .map_err(|e| ApiError::internal(format!("failed to store upload: {e}")))?;

        let video = UploadedVideo {
            video_id: video_id.clone(),
            filename: filename.to_owned(),
            size: bytes.len() as u64,
            path,
        };
        let _ = self.files.write().insert(video_id, video.clone());
        info!(video_id = %video.video_id, size = video.size, "video stored");
        Ok(video)
    }

    /// Path of a stored upload, if the id is known.
    #[must_use]
    pub fn path_for(&self, video_id: &str) -> Option<PathBuf> {
        self.files.read().get(video_id).map(|v| v.path.clone())
    }

    /// Number of stored uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}
