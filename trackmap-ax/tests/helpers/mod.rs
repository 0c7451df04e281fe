//! Test Helper Utilities
//!
//! Collaborator mocks and fixtures for trackmap-ax tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trackmap_ax::models::{CoverArt, RegistryMatch, ResolvedTags, VideoInfo};
use trackmap_ax::pipeline::Extractor;
use trackmap_ax::registry::{MetadataRegistry, RegistryError};
use trackmap_ax::tagging::{TagError, TagWriter};
use trackmap_ax::tools::{MediaTool, ToolError};

pub fn video(id: &str, title: &str, uploader: Option<&str>) -> VideoInfo {
    VideoInfo {
        id: id.to_string(),
        title: title.to_string(),
        uploader: uploader.map(str::to_string),
        playlist_title: None,
    }
}

/// Media tool with scripted video info; downloads write a small placeholder file
#[derive(Default)]
pub struct MockTool {
    pub infos: HashMap<String, VideoInfo>,
    pub failing_downloads: HashSet<String>,
    pub delays: HashMap<String, Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockTool {
    pub fn with_video(mut self, url: &str, info: VideoInfo) -> Self {
        self.infos.insert(url.to_string(), info);
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

#[async_trait]
impl MediaTool for MockTool {
    async fn inspect(&self, url: &str) -> Result<VideoInfo, ToolError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let result = self
            .infos
            .get(url)
            .cloned()
            .ok_or_else(|| ToolError::Parse(format!("no video at {}", url)));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn download_audio(
        &self,
        url: &str,
        workdir: &Path,
        id: &str,
    ) -> Result<PathBuf, ToolError> {
        if self.failing_downloads.contains(url) {
            return Err(ToolError::Failed {
                binary: "mock".to_string(),
                code: Some(1),
                stderr: "download blocked".to_string(),
            });
        }
        let path = workdir.join(format!("{}.mp3", id));
        tokio::fs::write(&path, b"audio").await.unwrap();
        Ok(path)
    }
}

/// Registry with scripted matches keyed by track title
#[derive(Default)]
pub struct MockRegistry {
    pub matches: HashMap<String, RegistryMatch>,
    pub covers: HashMap<String, Vec<u8>>,
    pub fail_lookups: bool,
    pub lookups: Mutex<Vec<(Option<String>, String)>>,
}

impl MockRegistry {
    pub fn with_match(mut self, track: &str, found: RegistryMatch) -> Self {
        self.matches.insert(track.to_string(), found);
        self
    }

    pub fn with_cover(mut self, url: &str, data: &[u8]) -> Self {
        self.covers.insert(url.to_string(), data.to_vec());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_lookups: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<(Option<String>, String)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataRegistry for MockRegistry {
    async fn lookup(
        &self,
        artist: Option<&str>,
        track: &str,
    ) -> Result<Option<RegistryMatch>, RegistryError> {
        self.lookups
            .lock()
            .unwrap()
            .push((artist.map(str::to_string), track.to_string()));
        if self.fail_lookups {
            return Err(RegistryError::Api(503, "unavailable".to_string()));
        }
        Ok(self.matches.get(track).cloned())
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        self.covers
            .get(url)
            .cloned()
            .ok_or_else(|| RegistryError::Api(404, format!("Failed to fetch {}", url)))
    }
}

/// Records every write instead of touching the file
#[derive(Default)]
pub struct MockTagger {
    pub failing_titles: HashSet<String>,
    pub writes: Mutex<Vec<(PathBuf, ResolvedTags, Option<CoverArt>)>>,
}

impl MockTagger {
    pub fn writes(&self) -> Vec<(PathBuf, ResolvedTags, Option<CoverArt>)> {
        self.writes.lock().unwrap().clone()
    }
}

impl TagWriter for MockTagger {
    fn write_tags(
        &self,
        path: &Path,
        tags: &ResolvedTags,
        cover: Option<&CoverArt>,
    ) -> Result<(), TagError> {
        if self.failing_titles.contains(&tags.title) {
            return Err(TagError::Write {
                path: path.display().to_string(),
                message: "read-only".to_string(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), tags.clone(), cover.cloned()));
        Ok(())
    }
}

pub fn extractor(
    tool: Arc<MockTool>,
    registry: Option<Arc<MockRegistry>>,
    tagger: Arc<MockTagger>,
) -> Extractor {
    Extractor::new(
        tool,
        registry.map(|r| r as Arc<dyn MetadataRegistry>),
        tagger,
    )
}

/// Names of the entries directly inside `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Serve `app` on an ephemeral local port; returns the base URL
pub async fn spawn_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}
