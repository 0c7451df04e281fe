//! Extracted audio downloads

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{ApiError, ApiResult, AppState};

/// Bare file name inside the output directory; no separators, no hidden entries
fn is_servable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name.ends_with(".mp3")
}

/// GET /download/audio/:name
///
/// Serves one file returned by `POST /api/extract` as an attachment.
pub async fn download_audio(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    if !is_servable_name(&name) {
        return Err(ApiError::BadRequest(format!("Invalid file name: {}", name)));
    }

    let path = state.settings.output_dir.join(&name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "_"));
            Ok((
                [
                    (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound(format!("No such file: {}", name)))
        }
        Err(e) => Err(ApiError::Io(e)),
    }
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/download/audio/:name", get(download_audio))
}
