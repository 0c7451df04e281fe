//! MusicBrainz recording search and Cover Art Archive lookup
//!
//! API Documentation: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! Requests to MusicBrainz are limited to 1 per second and carry an identifying
//! User-Agent, as the service requires.

use super::{MetadataRegistry, RegistryError};
use crate::models::RegistryMatch;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

const MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";
const COVER_ART_ARCHIVE_URL: &str = "https://coverartarchive.org";

#[derive(Debug, Deserialize)]
struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<MBRecording>,
}

#[derive(Debug, Deserialize)]
struct MBRecording {
    title: Option<String>,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<MBArtistCredit>,
    #[serde(default)]
    releases: Vec<MBRelease>,
}

#[derive(Debug, Deserialize)]
struct MBArtistCredit {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MBRelease {
    id: Option<String>,
    title: Option<String>,
    date: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverArtResponse {
    #[serde(default)]
    images: Vec<CoverArtImage>,
}

#[derive(Debug, Deserialize)]
struct CoverArtImage {
    #[serde(default)]
    front: bool,
    image: Option<String>,
}

/// Lucene query for a recording search
pub fn recording_query(artist: Option<&str>, track: &str) -> String {
    let escape = |s: &str| s.trim().replace('"', "\\\"");
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!(
            "artist:\"{}\" AND recording:\"{}\"",
            escape(artist),
            escape(track)
        ),
        None => format!("recording:\"{}\"", escape(track)),
    }
}

/// MusicBrainz + Cover Art Archive client
pub struct MusicBrainzRegistry {
    client: Client,
    base_url: String,
    cover_base_url: String,
    /// 1 request per second (MusicBrainz policy)
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl MusicBrainzRegistry {
    /// Client against the public services
    ///
    /// `user_agent` should come from [`trackmap_common::config::get_user_agent`].
    pub fn new(user_agent: &str) -> Result<Self, RegistryError> {
        Self::with_urls(user_agent, MUSICBRAINZ_API_URL, COVER_ART_ARCHIVE_URL)
    }

    /// Client against other base URLs (mirrors, tests)
    pub fn with_urls(
        user_agent: &str,
        base_url: impl Into<String>,
        cover_base_url: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::MIN));

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cover_base_url: cover_base_url.into().trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    /// Front cover URL for a release, else its first image
    async fn cover_url(&self, release_id: &str) -> Result<Option<String>, RegistryError> {
        let url = format!("{}/release/{}", self.cover_base_url, release_id);
        let response = self.client.get(&url).send().await?;

        // No artwork is reported as 404
        if !response.status().is_success() {
            debug!(release_id, status = %response.status(), "No cover art");
            return Ok(None);
        }

        let body: CoverArtResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;

        let chosen = body
            .images
            .iter()
            .find(|i| i.front)
            .or_else(|| body.images.first());
        Ok(chosen.and_then(|i| i.image.clone()))
    }
}

#[async_trait]
impl MetadataRegistry for MusicBrainzRegistry {
    async fn lookup(
        &self,
        artist: Option<&str>,
        track: &str,
    ) -> Result<Option<RegistryMatch>, RegistryError> {
        let query = recording_query(artist, track);

        self.rate_limiter.until_ready().await;

        debug!(query = %query, "Querying MusicBrainz");
        let response = self
            .client
            .get(format!("{}/recording", self.base_url))
            .query(&[("query", query.as_str()), ("fmt", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Api(status.as_u16(), body));
        }

        let body: RecordingSearchResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;

        let Some(recording) = body.recordings.into_iter().next() else {
            return Ok(None);
        };

        let release = recording
            .releases
            .iter()
            .find(|r| {
                r.status
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case("official"))
            })
            .or_else(|| recording.releases.first());

        let release_id = release.and_then(|r| r.id.clone());
        let cover_url = match &release_id {
            Some(id) => match self.cover_url(id).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(release_id = %id, error = %e, "Cover art lookup failed");
                    None
                }
            },
            None => None,
        };

        let artist = (!recording.artist_credit.is_empty()).then(|| {
            recording
                .artist_credit
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });

        Ok(Some(RegistryMatch {
            artist,
            title: recording.title,
            album: release.and_then(|r| r.title.clone()),
            date: release.and_then(|r| r.date.clone()),
            release_id,
            cover_url,
        }))
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Api(
                status.as_u16(),
                format!("Failed to fetch {}", url),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
