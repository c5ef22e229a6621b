//! HTTP error mapping
//!
//! Business outcomes from the session manager become typed client responses
//! here. Internal failures are logged with full detail and returned as a
//! generic message unless the config's `expose_internal_errors` development
//! flag is set.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use motors_session::Error as SessionError;

/// Error type returned by all handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation before reaching business logic.
    Validation(String),
    /// Session-manager outcome, mapped to a status by variant.
    Session {
        error: SessionError,
        expose_internal: bool,
    },
}

impl ApiError {
    /// Status code a session outcome maps to.
    fn session_status(error: &SessionError) -> StatusCode {
        match error {
            SessionError::DuplicateEmail => StatusCode::CONFLICT,
            SessionError::InvalidCredentials
            | SessionError::MissingRefreshToken
            | SessionError::InvalidOrExpiredRefreshToken
            | SessionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            SessionError::Forbidden => StatusCode::FORBIDDEN,
            SessionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Session {
                error,
                expose_internal,
            } => {
                let status = Self::session_status(&error);
                let message = match &error {
                    SessionError::Internal(detail) => {
                        error!(error = %detail, "internal error while handling request");
                        if expose_internal {
                            error.to_string()
                        } else {
                            "internal server error".to_string()
                        }
                    }
                    other => other.to_string(),
                };
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: SessionError) -> StatusCode {
        ApiError::Session {
            error,
            expose_internal: false,
        }
        .into_response()
        .status()
    }

    #[test]
    fn business_outcomes_map_to_client_statuses() {
        assert_eq!(status_of(SessionError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SessionError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(SessionError::MissingRefreshToken),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(SessionError::InvalidOrExpiredRefreshToken),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(SessionError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(SessionError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(SessionError::Internal("store offline".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("Invalid email format".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_detail_is_hidden_by_default() {
        use http_body_util::BodyExt;

        let response = ApiError::Session {
            error: SessionError::Internal("store offline".into()),
            expose_internal: false,
        }
        .into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("store offline"));
        assert!(body.contains("internal server error"));
    }

    #[tokio::test]
    async fn internal_detail_is_exposed_in_development_mode() {
        use http_body_util::BodyExt;

        let response = ApiError::Session {
            error: SessionError::Internal("store offline".into()),
            expose_internal: true,
        }
        .into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("store offline"));
    }
}
