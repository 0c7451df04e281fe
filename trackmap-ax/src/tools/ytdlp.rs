//! yt-dlp command-line client
//!
//! `inspect` runs `yt-dlp -J --no-playlist <url>`; `download_audio` extracts MP3 at best
//! quality with the title noise clean-up applied inside yt-dlp's own metadata.

use super::{MediaTool, ToolError};
use crate::models::VideoInfo;
use crate::title::{NOISE_SUFFIX_PATTERN, TRAILING_DASHES_PATTERN};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

const DEFAULT_BINARY: &str = "yt-dlp";

#[derive(Debug, Deserialize)]
struct InfoJson {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    playlist_title: Option<String>,
    #[serde(default)]
    entries: Vec<InfoEntry>,
}

#[derive(Debug, Deserialize)]
struct InfoEntry {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
}

/// Parse `yt-dlp -J` output
///
/// A playlist payload yields its first entry, with the playlist's own title kept as
/// `playlist_title`. A single video keeps whatever `playlist_title` yt-dlp reported.
pub fn parse_info(raw: &str) -> Result<VideoInfo, ToolError> {
    let json: InfoJson =
        serde_json::from_str(raw).map_err(|e| ToolError::Parse(e.to_string()))?;

    let (id, title, uploader, playlist_title) = match json.entries.into_iter().next() {
        Some(entry) => (entry.id, entry.title, entry.uploader, json.title),
        None => (json.id, json.title, json.uploader, json.playlist_title),
    };

    let id = id.filter(|s| !s.trim().is_empty());
    let title = title.filter(|s| !s.trim().is_empty());
    match (id, title) {
        (Some(id), Some(title)) => Ok(VideoInfo {
            id,
            title,
            uploader: uploader.filter(|s| !s.trim().is_empty()),
            playlist_title: playlist_title.filter(|s| !s.trim().is_empty()),
        }),
        _ => Err(ToolError::Parse("missing id or title".to_string())),
    }
}

/// Arguments for the audio download of one URL
pub fn download_args(url: &str, workdir: &Path, id: &str) -> Vec<String> {
    let template = workdir.join(format!("{}.%(ext)s", id));
    vec![
        url.to_string(),
        "-x".to_string(),
        "--audio-format".to_string(),
        "mp3".to_string(),
        "--audio-quality".to_string(),
        "0".to_string(),
        "--restrict-filenames".to_string(),
        "--no-playlist".to_string(),
        "--replace-in-metadata".to_string(),
        "title".to_string(),
        NOISE_SUFFIX_PATTERN.to_string(),
        String::new(),
        "--replace-in-metadata".to_string(),
        "title".to_string(),
        TRAILING_DASHES_PATTERN.to_string(),
        String::new(),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
    ]
}

/// yt-dlp client
pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    /// Client for `yt-dlp` on PATH
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run to completion; stdout on success
    async fn run(&self, args: &[String]) -> Result<String, ToolError> {
        debug!(binary = %self.binary, ?args, "Running media tool");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        if !stderr.is_empty() {
            debug!(binary = %self.binary, "{}", stderr);
        }

        if !output.status.success() {
            warn!(binary = %self.binary, code = ?output.status.code(), "Media tool failed");
            return Err(ToolError::Failed {
                binary: self.binary.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTool for YtDlp {
    async fn inspect(&self, url: &str) -> Result<VideoInfo, ToolError> {
        let args = vec!["-J".to_string(), "--no-playlist".to_string(), url.to_string()];
        let stdout = self.run(&args).await?;
        parse_info(&stdout)
    }

    async fn download_audio(
        &self,
        url: &str,
        workdir: &Path,
        id: &str,
    ) -> Result<PathBuf, ToolError> {
        let stdout = self.run(&download_args(url, workdir, id)).await?;
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!(binary = %self.binary, "{}", line);
        }

        let mp3 = workdir.join(format!("{}.mp3", id));
        if !tokio::fs::try_exists(&mp3).await.unwrap_or(false) {
            return Err(ToolError::MissingOutput(mp3.display().to_string()));
        }
        Ok(mp3)
    }
}
