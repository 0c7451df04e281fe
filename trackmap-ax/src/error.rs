//! Error types for trackmap-ax

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::ExtractError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// File read failure (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch could not start (500)
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Io(ref err) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", err.to_string()),
            ApiError::Extract(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXTRACT_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
