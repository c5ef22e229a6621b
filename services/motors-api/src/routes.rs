//! Router, shared state, and request handlers
//!
//! Endpoints:
//! - POST /auth/register      — create account, open session
//! - POST /auth/login         — authenticate, open session
//! - POST /auth/refresh-token — exchange the refresh cookie for a new access token
//! - POST /auth/logout        — clear the refresh cookie
//! - GET  /auth/me            — public fields of the authenticated caller
//! - GET  /admin/users        — list users (admin allow-list)
//! - GET  /health             — store ping + uptime
//!
//! The refresh token travels in an HTTP-only cookie; response bodies carry
//! the access token and public user fields only.

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use common::Role;
use motors_session::{Error as SessionError, PublicUser, SessionManager};

use crate::error::ApiError;
use crate::extract::AuthUser;

/// Cookie holding the refresh-token secret.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub started_at: Instant,
    pub expose_internal_errors: bool,
    pub cookie_secure: bool,
    pub refresh_cookie_max_age_secs: i64,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>, config: &crate::config::Config) -> Self {
        Self {
            sessions,
            started_at: Instant::now(),
            expose_internal_errors: config.server.expose_internal_errors,
            cookie_secure: config.auth.cookie_secure,
            refresh_cookie_max_age_secs: config.auth.refresh_token_ttl_days * 24 * 60 * 60,
        }
    }

    /// Wrap a session outcome for the response layer.
    fn err(&self, error: SessionError) -> ApiError {
        ApiError::Session {
            error,
            expose_internal: self.expose_internal_errors,
        }
    }
}

/// Build the axum router with all routes and shared state.
///
/// Applies a concurrency limit layer based on `max_connections`.
pub fn build_router(state: AppState, max_connections: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/admin/users", get(list_users))
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_connections))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    user: PublicUser,
    access_token: String,
}

#[derive(Debug, Serialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    user: PublicUser,
}

#[derive(Debug, Serialize)]
struct UsersResponse {
    users: Vec<PublicUser>,
}

/// POST /auth/register — create a user and open a session.
///
/// 201 with the public user and access token; the refresh secret goes out
/// in the cookie only.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&req.email, &req.password)?;

    let session = state
        .sessions
        .register(&req.email, &req.password)
        .await
        .map_err(|e| state.err(e))?;

    let jar = jar.add(refresh_cookie(&state, &session.refresh_token)?);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionResponse {
            user: session.user,
            access_token: session.access_token,
        }),
    ))
}

/// POST /auth/login — authenticate and open a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&req.email, &req.password)?;

    let session = state
        .sessions
        .login(&req.email, &req.password)
        .await
        .map_err(|e| state.err(e))?;

    let jar = jar.add(refresh_cookie(&state, &session.refresh_token)?);
    Ok((
        jar,
        Json(SessionResponse {
            user: session.user,
            access_token: session.access_token,
        }),
    ))
}

/// POST /auth/refresh-token — exchange the refresh cookie for a new access
/// token.
async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_owned());
    let access_token = state
        .sessions
        .refresh(token.as_deref())
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(AccessTokenResponse { access_token }))
}

/// POST /auth/logout — clear the refresh cookie.
///
/// The stored refresh-token record is left in place and ages out at its
/// expiry.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let jar = jar.add(expired_refresh_cookie(&state)?);
    Ok((
        jar,
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

/// GET /auth/me — public fields of the authenticated caller.
async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .sessions
        .user_profile(claims.sub)
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(UserResponse { user }))
}

/// GET /admin/users — list all users' public fields. Admin only.
async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UsersResponse>, ApiError> {
    state
        .sessions
        .authorize(&claims, &[Role::Admin])
        .map_err(|e| state.err(e))?;

    let users = state.sessions.list_users().await.map_err(|e| state.err(e))?;
    Ok(Json(UsersResponse { users }))
}

/// GET /health — store ping + uptime. 200 healthy, 503 when the store is
/// unreachable.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.started_at.elapsed().as_secs();
    match state.sessions.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "uptime_seconds": uptime })),
        ),
        Err(e) => {
            error!(error = %e, "store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "uptime_seconds": uptime })),
            )
        }
    }
}

/// Reject malformed registration/login input before it reaches business
/// logic.
fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }
    if !is_well_formed_email(email) {
        return Err(ApiError::Validation("Invalid email format".into()));
    }
    if password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Just enough shape checking to catch typos; the store treats the email as
/// an opaque unique key.
fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// HTTP-only refresh cookie scoped to the whole API.
fn refresh_cookie(state: &AppState, secret: &str) -> Result<Cookie<'static>, ApiError> {
    let raw = format!(
        "{REFRESH_COOKIE}={secret}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        state.refresh_cookie_max_age_secs,
        if state.cookie_secure { "; Secure" } else { "" },
    );
    Cookie::parse(raw).map_err(|e| state.err(SessionError::Internal(format!("building refresh cookie: {e}"))))
}

/// Max-Age=0 variant that instructs the client to drop the cookie.
fn expired_refresh_cookie(state: &AppState) -> Result<Cookie<'static>, ApiError> {
    let raw = format!(
        "{REFRESH_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        if state.cookie_secure { "; Secure" } else { "" },
    );
    Cookie::parse(raw).map_err(|e| state.err(SessionError::Internal(format!("building refresh cookie: {e}"))))
}
