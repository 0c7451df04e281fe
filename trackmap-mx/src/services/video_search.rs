//! Video search collaborator contract

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Video search errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Raw search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Video id, empty when the platform returned a non-video item
    pub id: String,
    pub title: String,
    pub channel: String,
}

/// Per-video detail record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoDetails {
    pub duration_ms: u64,
    pub description: String,
}

/// Remote video search
///
/// Both calls may fail. A failed `fetch_details` is partial data to the caller,
/// never a reason to abandon the track.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search videos for `query`, at most `limit` results in platform rank order
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Fetch duration and description for `ids`; ids missing from the map are unknown
    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoDetails>, SearchError>;
}
