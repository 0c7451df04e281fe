//! Catalog source collaborator contract

use crate::models::Track;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Catalog source errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Which collection to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSelector {
    /// The user's liked items
    Liked,
    /// A playlist by id
    Playlist(String),
}

/// Credentials handed to the catalog source at call time
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CatalogAccess {
    pub client_id: String,
    pub client_secret: String,
    /// User refresh token; without it only public collections are readable
    pub refresh_token: Option<String>,
}

impl CatalogAccess {
    pub fn has_client_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl fmt::Debug for CatalogAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogAccess")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source music catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Read every track of the selected collection, paginating internally
    async fn fetch_tracks(
        &self,
        selector: &CatalogSelector,
        access: &CatalogAccess,
    ) -> Result<Vec<Track>, CatalogError>;
}
