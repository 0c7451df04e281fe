//! Batch extraction endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::UrlFailure;
use crate::pipeline::{normalize_urls, ExtractOptions};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/extract request
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    /// Album override for the whole batch
    pub album: Option<String>,
    /// URLs processed at once (default 1, clamped 1-3)
    pub concurrency: Option<usize>,
}

/// POST /api/extract response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Written file names, in request order; fetch each from `/download/audio/<name>`
    pub files: Vec<String>,
    pub errors: Vec<UrlFailure>,
}

/// POST /api/extract
///
/// Downloads, tags and renames every URL; per-URL failures are listed in `errors`.
pub async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> ApiResult<Json<ExtractResponse>> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    let urls = normalize_urls(&request.urls);
    if urls.is_empty() {
        return Err(ApiError::BadRequest("No URLs provided".to_string()));
    }

    let options = ExtractOptions {
        album: request.album,
        concurrency: request.concurrency.unwrap_or(1),
    };

    let report = match state
        .extractor
        .extract_batch(urls, &options, &state.settings.output_dir)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Extraction batch failed");
            state.record_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    if let Some(failure) = report.errors.last() {
        state
            .record_error(format!("{}: {}", failure.url, failure.error))
            .await;
    }

    Ok(Json(ExtractResponse {
        files: report
            .files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect(),
        errors: report.errors,
    }))
}

/// Build extraction routes
pub fn extract_routes() -> Router<AppState> {
    Router::new().route("/api/extract", post(extract_handler))
}
