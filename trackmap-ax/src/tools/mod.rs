//! External media tool abstraction

pub mod ytdlp;

pub use ytdlp::{download_args, parse_info, YtDlp};

use crate::models::VideoInfo;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Media tool errors
#[derive(Debug, Error)]
pub enum ToolError {
    /// Binary missing or not executable
    #[error("Failed to start {binary}: {message}")]
    Spawn { binary: String, message: String },

    /// Process exited unsuccessfully
    #[error("{binary} exited with {code:?}: {stderr}")]
    Failed {
        binary: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Info output could not be read
    #[error("Failed to read video info: {0}")]
    Parse(String),

    /// Download reported success but left no audio file behind
    #[error("Expected output file missing: {0}")]
    MissingOutput(String),
}

/// Inspects and downloads videos
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Basic info without downloading
    async fn inspect(&self, url: &str) -> Result<VideoInfo, ToolError>;

    /// Download best audio as MP3 into `workdir`; returns `<workdir>/<id>.mp3`
    async fn download_audio(&self, url: &str, workdir: &Path, id: &str)
        -> Result<PathBuf, ToolError>;
}
