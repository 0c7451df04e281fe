//! YouTube Data API v3 client
//!
//! Implements [`VideoSearch`] with `search.list` (video results in the Music category)
//! and `videos.list` (contentDetails + snippet).
//!
//! API Reference: https://developers.google.com/youtube/v3/docs

use super::video_search::{SearchError, SearchHit, VideoDetails, VideoSearch};
use crate::matching::duration::parse_iso8601_duration_ms;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

/// `videos.list` accepts at most 50 ids per request
const MAX_IDS_PER_REQUEST: usize = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

/// YouTube Data API client
pub struct YouTubeClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, YOUTUBE_API_URL)
    }

    /// Client against an alternative API root (used by tests)
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, SearchError> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("YouTube {} request failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("Failed to parse YouTube {} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let max_results = limit.to_string();
        let response: SearchListResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", query),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("videoCategoryId", MUSIC_CATEGORY_ID),
                ],
            )
            .await?;

        let hits: Vec<SearchHit> = response
            .items
            .into_iter()
            .map(|item| {
                let snippet = item.snippet;
                SearchHit {
                    id: item.id.and_then(|id| id.video_id).unwrap_or_default(),
                    title: snippet.as_ref().map(|s| s.title.clone()).unwrap_or_default(),
                    channel: snippet.map(|s| s.channel_title).unwrap_or_default(),
                }
            })
            .collect();

        debug!(query = %query, results = hits.len(), "YouTube search complete");
        Ok(hits)
    }

    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoDetails>, SearchError> {
        let mut details = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let joined = chunk.join(",");
            let response: VideoListResponse = self
                .get_json(
                    "videos",
                    &[("part", "contentDetails,snippet"), ("id", joined.as_str())],
                )
                .await?;

            for item in response.items {
                let duration_ms = item
                    .content_details
                    .and_then(|c| c.duration)
                    .map(|d| parse_iso8601_duration_ms(&d))
                    .unwrap_or(0);
                let description = item.snippet.map(|s| s.description).unwrap_or_default();
                details.insert(
                    item.id,
                    VideoDetails {
                        duration_ms,
                        description,
                    },
                );
            }
        }

        Ok(details)
    }
}
