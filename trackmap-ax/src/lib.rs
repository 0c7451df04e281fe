//! trackmap-ax library
//!
//! Turns video URLs into tagged MP3 files: media tool download, title parsing,
//! metadata registry enrichment, ID3v2 tagging and canonical file naming.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod tagging;
pub mod title;
pub mod tools;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use config::ExtractSettings;
use pipeline::Extractor;
use registry::{MetadataRegistry, MusicBrainzRegistry};
use std::sync::Arc;
use tagging::LoftyTagWriter;
use tokio::sync::RwLock;
use tools::YtDlp;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5741;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ExtractSettings>,
    pub extractor: Arc<Extractor>,
    pub startup_time: DateTime<Utc>,
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(settings: ExtractSettings, extractor: Extractor) -> Self {
        Self {
            settings: Arc::new(settings),
            extractor: Arc::new(extractor),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Extractor wired with yt-dlp, MusicBrainz (when enabled) and lofty
pub fn build_extractor(settings: &ExtractSettings) -> anyhow::Result<Extractor> {
    let registry: Option<Arc<dyn MetadataRegistry>> = if settings.musicbrainz {
        Some(Arc::new(MusicBrainzRegistry::new(&settings.user_agent)?))
    } else {
        info!("Metadata registry disabled, tags come from video info only");
        None
    };

    Ok(Extractor::new(
        Arc::new(YtDlp::with_binary(settings.ytdlp_binary.clone())),
        registry,
        Arc::new(LoftyTagWriter),
    ))
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::extract_routes())
        .merge(api::download_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
