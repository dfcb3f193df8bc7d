//! External source search, fetch and add-to-library endpoints

use audionest_common::models::ExternalSource;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::files::audio_file_response;
use super::{AuthenticatedUser, JsonBody};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub search_query: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAudioRequest {
    pub title: String,
    pub artist: Option<String>,
}

/// GET /api/sources?searchQuery=
pub async fn search_sources(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<ExternalSource>>> {
    info!("Searching sources for '{}'", params.search_query);

    let results = state
        .services
        .lookup
        .search(&params.search_query)
        .await
        .map_err(|e| ApiError::from_service(e, "searching sources"))?;

    info!("Returning {} sources", results.len());
    Ok(Json(results))
}

/// GET /api/sources/:source_id/audio
///
/// Acquires the audio on first request, then streams it.
pub async fn get_source_audio(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> ApiResult<Response> {
    info!("Fetching audio for source '{}'", source_id);
    let action = "fetching source audio";

    let artifact = state
        .services
        .acquirer
        .acquire(&source_id)
        .await
        .map_err(|e| ApiError::from_service(e, action))?;

    audio_file_response(&artifact)
        .await
        .map_err(|e| ApiError::from_service(e, action))
}

/// PUT /api/sources/:source_id/audio
///
/// Acquires the audio and adds it to the caller's library.
pub async fn add_source_audio(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(source_id): Path<String>,
    JsonBody(request): JsonBody<AddAudioRequest>,
) -> ApiResult<StatusCode> {
    info!("Adding source '{}' to library of {}", source_id, user.email);
    let action = "adding user audio";
    let services = &state.services;

    // Skip acquisition entirely for an obvious duplicate
    services
        .registrar
        .ensure_not_registered(user.id, &source_id)
        .await
        .map_err(|e| ApiError::from_service(e, action))?;

    let artifact = services
        .acquirer
        .acquire(&source_id)
        .await
        .map_err(|e| ApiError::from_service(e, action))?;

    let entry = services
        .registrar
        .register(user.id, &artifact, &request.title, request.artist.as_deref())
        .await
        .map_err(|e| ApiError::from_service(e, action))?;

    info!("Library entry {} created for {}", entry.id, user.email);
    Ok(StatusCode::OK)
}

pub fn source_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sources", get(search_sources))
        .route(
            "/api/sources/:source_id/audio",
            get(get_source_audio).put(add_source_audio),
        )
}
