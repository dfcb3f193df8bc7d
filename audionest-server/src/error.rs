//! Error types for audionest-server
//!
//! `Error` is the domain error returned by services and adapters. `ApiError`
//! is what HTTP handlers return; the conversion between the two decides the
//! status code and what detail the client gets to see.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Result type for services and adapters
pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown user, wrong password, or a token that does not verify
    #[error("Could not validate credentials")]
    AuthenticationFailure,

    #[error("User '{0}' is already registered")]
    AlreadyRegistered(String),

    /// The user already holds an entry for this source
    #[error("Audio from source '{source_id}' is already in the library of user {user_id}")]
    DuplicateLibraryEntry { user_id: Uuid, source_id: String },

    #[error("Library entry {0} not found")]
    EntryNotFound(Uuid),

    #[error("Invalid source id: {0}")]
    InvalidSourceId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// yt-dlp (or the transcoder it drives) failed or produced bad output
    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Stored data could not be mapped back into a domain value
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Common error: {0}")]
    Common(#[from] audionest_common::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. audio already in the user's library
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a service error to its HTTP form, logging it with the action that failed
    ///
    /// Client errors are logged at warn level with their full message. Anything
    /// else is logged at error level and the client only gets a generic message.
    pub fn from_service(err: Error, action: &str) -> Self {
        match err {
            Error::AuthenticationFailure | Error::Token(_) => {
                warn!("Authentication failed while {}: {}", action, err);
                ApiError::Unauthorized(Error::AuthenticationFailure.to_string())
            }
            Error::DuplicateLibraryEntry { .. } | Error::AlreadyRegistered(_) => {
                warn!("Conflict while {}: {}", action, err);
                ApiError::Conflict(err.to_string())
            }
            Error::EntryNotFound(_) => {
                warn!("Not found while {}: {}", action, err);
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidSourceId(_) | Error::InvalidInput(_) => {
                warn!("Rejected request while {}: {}", action, err);
                ApiError::BadRequest(err.to_string())
            }
            Error::Common(audionest_common::Error::InvalidInput(msg)) => {
                warn!("Rejected request while {}: {}", action, msg);
                ApiError::BadRequest(msg)
            }
            other => {
                error!("Exception found while {}: {}", action, other);
                ApiError::Internal(format!("An unexpected error occurred while {}", action))
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::from_service(err, "processing request")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
