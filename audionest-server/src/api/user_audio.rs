//! Endpoints over the caller's own library

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::files::audio_file_response;
use super::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Library entry as listed to its owner
#[derive(Debug, Serialize, Deserialize)]
pub struct UserAudioItem {
    pub id: Uuid,
    pub title: String,
    pub artist: Option<String>,
}

/// GET /api/user-audio
pub async fn list_user_audio(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<Json<Vec<UserAudioItem>>> {
    info!("Listing library of {}", user.email);

    let entries = state
        .services
        .reader
        .list(user.id)
        .await
        .map_err(|e| ApiError::from_service(e, "getting user audio list"))?;

    info!("Returning {} entries for {}", entries.len(), user.email);
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| UserAudioItem {
                id: entry.id,
                title: entry.title,
                artist: entry.artist,
            })
            .collect(),
    ))
}

/// GET /api/user-audio/:id
pub async fn get_user_audio(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    info!("Fetching library entry {} for {}", id, user.email);
    let action = "getting user audio";

    let entry = state
        .services
        .reader
        .get(user.id, id)
        .await
        .map_err(|e| ApiError::from_service(e, action))?;

    audio_file_response(&entry.audio)
        .await
        .map_err(|e| ApiError::from_service(e, action))
}

/// DELETE /api/user-audio/:id
pub async fn delete_user_audio(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    info!("Deleting library entry {} for {}", id, user.email);

    state
        .services
        .remover
        .remove(user.id, id)
        .await
        .map_err(|e| ApiError::from_service(e, "deleting user audio"))?;

    Ok(StatusCode::OK)
}

pub fn user_audio_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user-audio", get(list_user_audio))
        .route(
            "/api/user-audio/:id",
            get(get_user_audio).delete(delete_user_audio),
        )
}
