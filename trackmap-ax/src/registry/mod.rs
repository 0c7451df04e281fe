//! Metadata registry abstraction (recording lookup and cover art)

pub mod musicbrainz;

pub use musicbrainz::{recording_query, MusicBrainzRegistry};

use crate::models::RegistryMatch;
use async_trait::async_trait;
use thiserror::Error;

/// Metadata registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Registry returned {0}: {1}")]
    Api(u16, String),

    #[error("Failed to parse registry response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

/// Looks up canonical recording metadata
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    /// Best recording for an optional artist and a track title; `None` when nothing matched
    async fn lookup(
        &self,
        artist: Option<&str>,
        track: &str,
    ) -> Result<Option<RegistryMatch>, RegistryError>;

    /// Download cover image bytes
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, RegistryError>;
}
