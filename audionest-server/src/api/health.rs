//! Liveness probe for process supervisors and load balancers

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

/// GET /health
///
/// Answers without touching the database or yt-dlp, and needs no token.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        module: "audionest",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
