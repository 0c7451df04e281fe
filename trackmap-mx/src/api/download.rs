//! Mapping file downloads

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;

use crate::output::OutputPaths;
use crate::{ApiError, ApiResult, AppState};

/// GET /download/json
pub async fn download_json(State(state): State<AppState>) -> ApiResult<Response> {
    let path = OutputPaths::in_dir(&state.settings.output_dir).json;
    serve_file(path, "application/json").await
}

/// GET /download/csv
pub async fn download_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let path = OutputPaths::in_dir(&state.settings.output_dir).csv;
    serve_file(path, "text/csv; charset=utf-8").await
}

async fn serve_file(path: PathBuf, content_type: &'static str) -> ApiResult<Response> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("No file yet".to_string()))
        }
        Err(e) => Err(ApiError::Io(e)),
    }
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/download/json", get(download_json))
        .route("/download/csv", get(download_csv))
}
