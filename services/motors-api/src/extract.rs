//! Request authentication extractor

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use motors_session::AccessClaims;

use crate::routes::AppState;

/// Extractor that validates a Bearer access token and provides the decoded
/// claims. Handlers taking `AuthUser` reject unauthenticated callers with
/// 401 before the handler body runs; role checks stay in the handler.
#[derive(Debug)]
pub struct AuthUser(pub AccessClaims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(value) => match value.strip_prefix("Bearer ") {
                Some(token) => token,
                None => return Err(unauthenticated("invalid authorization header format")),
            },
            None => return Err(unauthenticated("missing authorization header")),
        };

        match state.sessions.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => Err(unauthenticated("invalid or expired token")),
        }
    }
}

fn unauthenticated(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}
