//! Extraction pipeline
//!
//! Per URL: inspect → parse title → download audio → registry lookup (best effort) →
//! resolve tags → fetch cover (best effort) → write tags → move to canonical name.
//! A batch runs up to three URLs at once in a private work directory under the
//! output directory; one URL failing never affects the others.

use crate::models::{CoverArt, RegistryMatch, UrlFailure, VideoInfo};
use crate::naming::canonical_file_name;
use crate::registry::MetadataRegistry;
use crate::resolve::TagSources;
use crate::tagging::{TagError, TagWriter};
use crate::title::{clean_title_suffix, parse_artist_track};
use crate::tools::{MediaTool, ToolError};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Upper bound on URLs processed at once
pub const MAX_CONCURRENCY: usize = 3;

/// Prefix of the per-batch work directory inside the output directory
const WORKDIR_PREFIX: &str = ".trackmap-";

/// Per-URL extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Batch options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Album written to every file, overriding registry and playlist titles
    pub album: Option<String>,
    /// URLs processed at once (clamped 1-3)
    pub concurrency: usize,
}

impl ExtractOptions {
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

/// Outcome of one batch, in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub files: Vec<PathBuf>,
    pub errors: Vec<UrlFailure>,
}

/// Trim, drop blanks and duplicates (first occurrence wins)
pub fn normalize_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(|u| u.as_ref().trim().to_string())
        .filter(|u| !u.is_empty())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Runs extractions against injected collaborators
pub struct Extractor {
    tool: Arc<dyn MediaTool>,
    registry: Option<Arc<dyn MetadataRegistry>>,
    tagger: Arc<dyn TagWriter>,
}

impl Extractor {
    pub fn new(
        tool: Arc<dyn MediaTool>,
        registry: Option<Arc<dyn MetadataRegistry>>,
        tagger: Arc<dyn TagWriter>,
    ) -> Self {
        Self {
            tool,
            registry,
            tagger,
        }
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    /// Extract a batch of URLs into `out_dir`
    ///
    /// Fails as a whole only when the work directory cannot be created.
    pub async fn extract_batch(
        &self,
        urls: Vec<String>,
        options: &ExtractOptions,
        out_dir: &Path,
    ) -> Result<ExtractReport, ExtractError> {
        let urls = normalize_urls(urls);
        let total = urls.len();
        let concurrency = options.effective_concurrency();
        let batch_id = Uuid::new_v4();

        info!(%batch_id, total, concurrency, "Starting extraction batch");
        if urls.is_empty() {
            return Ok(ExtractReport::default());
        }

        tokio::fs::create_dir_all(out_dir).await?;
        let workdir = out_dir.join(format!("{}{}", WORKDIR_PREFIX, batch_id));
        tokio::fs::create_dir(&workdir).await?;

        let album = options.album.as_deref();
        let workdir_ref = workdir.as_path();

        let mut results: Vec<(usize, String, Result<PathBuf, ExtractError>)> =
            stream::iter(urls.into_iter().enumerate())
                .map(|(idx, url)| async move {
                    let result = self.process_url(&url, workdir_ref, out_dir, album).await;
                    (idx, url, result)
                })
                .buffer_unordered(concurrency)
                .enumerate()
                .map(|(done, item)| {
                    if (done + 1) % 10 == 0 || done + 1 == total {
                        info!(%batch_id, "Progress: {}/{} URLs processed", done + 1, total);
                    }
                    item
                })
                .collect()
                .await;

        if let Err(e) = tokio::fs::remove_dir_all(&workdir).await {
            warn!(workdir = %workdir.display(), error = %e, "Failed to remove work directory");
        }

        results.sort_by_key(|(idx, _, _)| *idx);

        let mut report = ExtractReport::default();
        for (_, url, result) in results {
            match result {
                Ok(path) => report.files.push(path),
                Err(e) => {
                    warn!(url = %url, error = %e, "Extraction failed");
                    report.errors.push(UrlFailure {
                        url,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            %batch_id,
            files = report.files.len(),
            errors = report.errors.len(),
            "Extraction batch complete"
        );
        Ok(report)
    }

    /// Extract one URL; the tagged file ends up in `out_dir` under its canonical name
    pub async fn process_url(
        &self,
        url: &str,
        workdir: &Path,
        out_dir: &Path,
        forced_album: Option<&str>,
    ) -> Result<PathBuf, ExtractError> {
        let info = self.tool.inspect(url).await?;
        debug!(url, id = %info.id, title = %info.title, "Video info");

        let cleaned = clean_title_suffix(&info.title);
        let guess = parse_artist_track(&cleaned);

        let audio = self.tool.download_audio(url, workdir, &info.id).await?;

        let registry_match = self
            .lookup(&info, guess.artist.as_deref(), guess.track.as_deref())
            .await;

        let tags = TagSources {
            info: &info,
            cleaned_title: &cleaned,
            guess: &guess,
            registry: registry_match.as_ref(),
            forced_album,
        }
        .resolve();

        let cover = self.cover(registry_match.as_ref()).await;

        let tagger = self.tagger.clone();
        let tag_path = audio.clone();
        let tag_values = tags.clone();
        tokio::task::spawn_blocking(move || {
            tagger.write_tags(&tag_path, &tag_values, cover.as_ref())
        })
        .await
        .map_err(|e| ExtractError::Internal(format!("Tag task join error: {}", e)))??;

        let file_name = canonical_file_name(&tags.artist, &tags.title, &info.id);
        let destination = out_dir.join(file_name);
        tokio::fs::rename(&audio, &destination).await?;

        info!(url, file = %destination.display(), "Extracted");
        Ok(destination)
    }

    /// Registry lookup; failures only cost the enrichment
    async fn lookup(
        &self,
        info: &VideoInfo,
        parsed_artist: Option<&str>,
        track: Option<&str>,
    ) -> Option<RegistryMatch> {
        let registry = self.registry.as_ref()?;
        let track = track.map(str::trim).filter(|t| !t.is_empty())?;
        let artist = parsed_artist.or(info.uploader.as_deref());

        match registry.lookup(artist, track).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(id = %info.id, "No registry match");
                }
                found
            }
            Err(e) => {
                warn!(id = %info.id, error = %e, "Metadata lookup failed");
                None
            }
        }
    }

    /// Cover bytes; a failed download only skips embedding
    async fn cover(&self, registry_match: Option<&RegistryMatch>) -> Option<CoverArt> {
        let registry = self.registry.as_ref()?;
        let url = registry_match?.cover_url.as_deref()?;

        match registry.fetch_cover(url).await {
            Ok(data) if !data.is_empty() => Some(CoverArt { data }),
            Ok(_) => None,
            Err(e) => {
                warn!(cover_url = url, error = %e, "Cover download failed, embedding skipped");
                None
            }
        }
    }
}
