//! Spotify Web API catalog client
//!
//! Obtains an access token (refresh-token grant when a user token is configured,
//! client-credentials grant otherwise) and pages through liked tracks or a
//! playlist until a short page is returned.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use super::catalog::{CatalogAccess, CatalogError, CatalogSelector, CatalogSource};
use crate::models::{Album, Track};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const API_URL: &str = "https://api.spotify.com/v1";

const LIKED_PAGE_LIMIT: usize = 50;
const PLAYLIST_PAGE_LIMIT: usize = 100;

/// Pause between page requests
const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(120);

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    items: Vec<PageItem>,
}

#[derive(Debug, Deserialize)]
struct PageItem {
    track: Option<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    duration_ms: u64,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    isrc: Option<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(t: SpotifyTrack) -> Self {
        Track {
            id: t.id.unwrap_or_default(),
            name: t.name,
            duration_ms: t.duration_ms,
            artists: t.artists.into_iter().map(|a| a.name).collect(),
            album: t
                .album
                .map(|a| Album {
                    name: a.name,
                    release_date: a.release_date,
                })
                .unwrap_or_default(),
            isrc: t.external_ids.and_then(|e| e.isrc),
        }
    }
}

/// Spotify catalog client
pub struct SpotifyCatalog {
    http_client: Client,
    accounts_url: String,
    api_url: String,
    page_delay: Duration,
}

impl SpotifyCatalog {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_urls(ACCOUNTS_URL, API_URL)
    }

    /// Client against alternative account/API roots (used by tests)
    pub fn with_urls(accounts_url: &str, api_url: &str) -> Result<Self, CatalogError> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    async fn access_token(&self, access: &CatalogAccess) -> Result<String, CatalogError> {
        if !access.has_client_credentials() {
            return Err(CatalogError::Unauthorized(
                "Spotify client id and secret are required".to_string(),
            ));
        }

        let refresh_token = access
            .refresh_token
            .as_deref()
            .filter(|t| !t.trim().is_empty());
        let form: Vec<(&str, &str)> = match refresh_token {
            Some(token) => vec![("grant_type", "refresh_token"), ("refresh_token", token)],
            None => vec![("grant_type", "client_credentials")],
        };

        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&access.client_id, Some(&access.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unauthorized(format!(
                "Token request returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse token response: {}", e)))?;

        debug!(
            grant = if refresh_token.is_some() { "refresh_token" } else { "client_credentials" },
            "Obtained Spotify access token"
        );
        Ok(token.access_token)
    }

    async fn fetch_page(
        &self,
        url: &str,
        token: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Page, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Page request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized("Access token rejected".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse page: {}", e)))
    }
}

/// `<api>/playlists/<id>/tracks` with the id percent-encoded as one path segment
fn playlist_tracks_url(api_url: &str, id: &str) -> Result<String, CatalogError> {
    let mut url = reqwest::Url::parse(api_url)
        .map_err(|e| CatalogError::Parse(format!("Invalid API URL {}: {}", api_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| CatalogError::Parse(format!("API URL cannot take a path: {}", api_url)))?
        .pop_if_empty()
        .extend(["playlists", id, "tracks"]);
    Ok(url.to_string())
}

#[async_trait]
impl CatalogSource for SpotifyCatalog {
    async fn fetch_tracks(
        &self,
        selector: &CatalogSelector,
        access: &CatalogAccess,
    ) -> Result<Vec<Track>, CatalogError> {
        let (url, limit) = match selector {
            CatalogSelector::Liked => {
                if access.refresh_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
                    return Err(CatalogError::Unauthorized(
                        "Liked songs require a user refresh token".to_string(),
                    ));
                }
                (format!("{}/me/tracks", self.api_url), LIKED_PAGE_LIMIT)
            }
            CatalogSelector::Playlist(id) => {
                (playlist_tracks_url(&self.api_url, id)?, PLAYLIST_PAGE_LIMIT)
            }
        };

        let token = self.access_token(access).await?;

        let mut tracks = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.fetch_page(&url, &token, limit, offset).await?;
            let page_len = page.items.len();

            tracks.extend(page.items.into_iter().filter_map(|item| item.track).map(Track::from));

            debug!(offset, page_len, "Fetched catalog page");
            if page_len < limit {
                break;
            }
            offset += limit;
            tokio::time::sleep(self.page_delay).await;
        }

        info!(selector = ?selector, tracks = tracks.len(), "Catalog fetch complete");
        Ok(tracks)
    }
}
