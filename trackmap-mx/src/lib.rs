//! trackmap-mx library
//!
//! Maps catalog tracks to their best-matching official-audio videos: catalog fetch,
//! candidate search and enrichment, heuristic and AI-assisted selection, and the
//! JSON/CSV mapping files.

pub mod api;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod output;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use config::ServiceSettings;
use matching::{EngineConfig, TrackMatcher};
use services::{AiJudge, CatalogSource, OllamaJudge, SpotifyCatalog, VideoSearch, YouTubeClient};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5740;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ServiceSettings>,
    pub catalog: Arc<dyn CatalogSource>,
    /// `None` until a video search key is configured; batches then fail with a config error
    pub search: Option<Arc<dyn VideoSearch>>,
    pub judge: Option<Arc<dyn AiJudge>>,
    pub engine: EngineConfig,
    pub startup_time: DateTime<Utc>,
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        settings: ServiceSettings,
        catalog: Arc<dyn CatalogSource>,
        search: Option<Arc<dyn VideoSearch>>,
        judge: Option<Arc<dyn AiJudge>>,
        engine: EngineConfig,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog,
            search,
            judge,
            engine,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Wire the production collaborators from resolved settings
    pub fn from_settings(settings: ServiceSettings, engine: EngineConfig) -> anyhow::Result<Self> {
        let catalog: Arc<dyn CatalogSource> = Arc::new(SpotifyCatalog::new()?);
        let search = match settings.youtube_api_key.clone() {
            Some(key) => Some(Arc::new(YouTubeClient::new(key)?) as Arc<dyn VideoSearch>),
            None => {
                warn!("YouTube API key not configured; mapping runs will fail until it is set");
                None
            }
        };
        let judge = build_judge(&settings);

        Ok(Self::new(settings, catalog, search, judge, engine))
    }

    /// Matcher for one batch; fails when video search is not configured
    pub fn matcher(&self) -> trackmap_common::Result<TrackMatcher> {
        let search = match &self.search {
            Some(search) => search.clone(),
            None => {
                self.settings.require_youtube_api_key()?;
                return Err(trackmap_common::Error::Internal(
                    "Video search client not initialized".to_string(),
                ));
            }
        };
        Ok(TrackMatcher::new(search, self.judge.clone(), self.engine.clone()))
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// AI judge from settings; construction failure disables the judge
pub fn build_judge(settings: &ServiceSettings) -> Option<Arc<dyn AiJudge>> {
    let judge_settings = settings.judge.clone()?;
    match OllamaJudge::new(judge_settings) {
        Ok(judge) => Some(Arc::new(judge)),
        Err(e) => {
            warn!(error = %e, "Failed to initialize AI judge, continuing without it");
            None
        }
    }
}

/// Matcher for a one-shot run from resolved settings
pub fn build_matcher(
    settings: &ServiceSettings,
    engine: EngineConfig,
) -> anyhow::Result<TrackMatcher> {
    let key = settings.require_youtube_api_key()?;
    let search: Arc<dyn VideoSearch> = Arc::new(YouTubeClient::new(key.to_string())?);
    Ok(TrackMatcher::new(search, build_judge(settings), engine))
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::run_routes())
        .merge(api::download_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
