//! audionest-server library
//!
//! Search an external video platform, acquire audio once per source, and keep
//! per-user libraries behind bearer-token authentication.

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod traits;
pub mod ytdlp;

pub use error::{ApiError, ApiResult, Error, Result};
pub use services::ServiceContainer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceContainer>,
}

impl AppState {
    pub fn new(services: ServiceContainer) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::auth_routes())
        .merge(api::source_routes())
        .merge(api::user_audio_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
