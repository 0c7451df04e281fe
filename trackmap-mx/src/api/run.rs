//! Mapping run endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::MatchOptions;
use crate::services::CatalogSelector;
use crate::workflow::run_mapping;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/run request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// "liked" or "playlist"
    pub mode: Option<String>,
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub options: MatchOptions,
}

impl RunRequest {
    /// Catalog selector, or `None` for an unknown mode / missing playlist id
    pub fn selector(&self) -> Option<CatalogSelector> {
        match self.mode.as_deref() {
            Some("liked") => Some(CatalogSelector::Liked),
            Some("playlist") => self
                .playlist_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| CatalogSelector::Playlist(id.to_string())),
            _ => None,
        }
    }
}

/// POST /api/run response
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub count: usize,
    /// Download path of the JSON mapping
    pub json: String,
    /// Download path of the CSV mapping
    pub csv: String,
}

/// POST /api/run
///
/// Fetches the selected collection, matches every track and writes the mapping files.
pub async fn run_mapping_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> ApiResult<Json<RunResponse>> {
    let bad_params = || ApiError::BadRequest("Bad params".to_string());

    let Json(request) = payload.map_err(|_| bad_params())?;
    let selector = request.selector().ok_or_else(bad_params)?;

    let result = async {
        let access = state.settings.require_catalog_access()?;
        let matcher = state.matcher()?;
        let report = run_mapping(
            state.catalog.as_ref(),
            access,
            &selector,
            &matcher,
            &request.options,
            &state.settings.output_dir,
        )
        .await?;
        Ok::<_, ApiError>(report)
    }
    .await;

    match result {
        Ok(report) => Ok(Json(RunResponse {
            count: report.rows.len(),
            json: "/download/json".to_string(),
            csv: "/download/csv".to_string(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "Mapping run failed");
            state.record_error(e.to_string()).await;
            Err(e)
        }
    }
}

/// Build run routes
pub fn run_routes() -> Router<AppState> {
    Router::new().route("/api/run", post(run_mapping_handler))
}
