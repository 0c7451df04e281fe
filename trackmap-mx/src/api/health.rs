//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok", or "degraded" when video search is not configured)
    pub status: String,
    /// Module name ("trackmap-mx")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// AI judge configured
    pub ai_judge: bool,
    /// Last error message if any (for diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let last_error = state.last_error.read().await.clone();
    let status = if state.search.is_some() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        module: "trackmap-mx".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        ai_judge: state.judge.is_some(),
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
