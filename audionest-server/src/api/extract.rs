//! Request extractors: bearer token authentication and request bodies

use audionest_common::models::UserAccount;
use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Form, Json,
};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// The account behind the request's `Authorization: Bearer <token>` header
///
/// Add as a handler argument to require authentication; missing or invalid
/// tokens are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserAccount);

/// Token part of a `Bearer` authorization header (scheme is case-insensitive)
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            warn!("Rejected {} {}: missing bearer token", parts.method, parts.uri.path());
            return Err(ApiError::Unauthorized("Not authenticated".to_string()));
        };

        state
            .services
            .identity
            .resolve(token)
            .await
            .map(AuthenticatedUser)
            .map_err(|e| ApiError::from_service(e, "authenticating request"))
    }
}

/// JSON body whose rejections use the API error format (400)
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!("Rejected JSON body for {}: {}", path, rejection.body_text());
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}

/// Form body whose rejections use the API error format (400)
pub struct FormBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormBody<T>
where
    Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(FormBody(value)),
            Err(rejection) => {
                warn!("Rejected form body for {}: {}", path, rejection.body_text());
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
