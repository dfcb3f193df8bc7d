//! Registration and token endpoints

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::FormBody;
use crate::error::{ApiError, ApiResult};
use crate::{AppState, Error};

/// OAuth2 password-flow style form; `username` carries the email
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register
///
/// Registering an email that already exists is logged and answered with 200.
pub async fn register(
    State(state): State<AppState>,
    FormBody(form): FormBody<CredentialsForm>,
) -> ApiResult<StatusCode> {
    info!("Registering user '{}'", form.username);

    match state
        .services
        .identity
        .register(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            info!("User '{}' registered", user.email);
            Ok(StatusCode::OK)
        }
        Err(Error::AlreadyRegistered(email)) => {
            warn!("Registration of '{}' ignored: already registered", email);
            Ok(StatusCode::OK)
        }
        Err(e) => Err(ApiError::from_service(e, "registering user")),
    }
}

/// POST /api/auth/token
pub async fn issue_token(
    State(state): State<AppState>,
    FormBody(form): FormBody<CredentialsForm>,
) -> ApiResult<Json<AccessTokenResponse>> {
    info!("Issuing token for '{}'", form.username);

    let access_token = state
        .services
        .identity
        .authenticate(&form.username, &form.password)
        .await
        .map_err(|e| ApiError::from_service(e, "issuing token"))?;

    info!("Token issued for '{}'", form.username);
    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/token", post(issue_token))
}
