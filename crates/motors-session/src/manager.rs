//! Credential & session manager
//!
//! Composes the password/token primitives over a `SessionStore`:
//! registration, login, refresh-token exchange, access-token verification,
//! and role authorization. All settings arrive through `SessionConfig` at
//! construction; nothing in here reads the process environment.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use common::{Role, Secret};
use motors_auth::access::{self, AccessClaims};
use motors_auth::{password, refresh};
use motors_store::{NewUser, RefreshTokenRecord, SessionStore, StoreError, UserRecord};

use crate::error::{Error, Result};

/// Settings for the session manager.
#[derive(Debug)]
pub struct SessionConfig {
    /// HS256 signing secret for access tokens
    pub jwt_secret: Secret<String>,
    /// Access-token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh-token lifetime in days
    pub refresh_token_ttl_days: i64,
    /// bcrypt work factor for passwords and refresh-token hashes
    pub bcrypt_cost: u32,
}

impl SessionConfig {
    /// Production defaults: 15-minute access tokens, 7-day refresh tokens,
    /// cost-12 hashing.
    pub fn new(jwt_secret: Secret<String>) -> Self {
        Self {
            jwt_secret,
            access_token_ttl_secs: 900,
            refresh_token_ttl_days: 7,
            bcrypt_cost: password::DEFAULT_COST,
        }
    }
}

/// Public user fields, safe to return to callers.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Result of registration and login.
///
/// `refresh_token` is the secret's only plaintext appearance. The caller
/// stores it (e.g. as an HTTP-only cookie); it is not retrievable again.
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// The credential & session manager.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store, for the health endpoint and purge task.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Register a new user and open a session for them.
    ///
    /// Self-registered users get the default `client` role. The email check
    /// here can race a concurrent registration; the store's uniqueness
    /// check is authoritative and the loser surfaces as `DuplicateEmail`.
    pub async fn register(&self, email: &str, password_plain: &str) -> Result<Session> {
        if self
            .store
            .find_user_by_email(email)
            .await
            .map_err(internal)?
            .is_some()
        {
            return Err(Error::DuplicateEmail);
        }

        let password_hash = password::hash(password_plain, self.config.bcrypt_cost)?;
        let user = match self
            .store
            .create_user(NewUser {
                email: email.to_owned(),
                password_hash,
                role: Role::default(),
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::Conflict(_)) => return Err(Error::DuplicateEmail),
            Err(e) => return Err(internal(e)),
        };

        info!(user_id = user.id, "registered user");
        self.open_session(user).await
    }

    /// Authenticate credentials and open a session.
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`.
    /// Each login mints an additional refresh-token record; records from
    /// earlier logins stay valid until they expire (multi-device).
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<Session> {
        let user = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(internal)?
            .ok_or(Error::InvalidCredentials)?;

        if !password::verify(password_plain, &user.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        debug!(user_id = user.id, "credentials verified");
        self.open_session(user).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The stored hashes are salted, so there is nothing to look up by
    /// value: every record is verified against the presented plaintext,
    /// short-circuiting on the first hash match. A match only counts while
    /// its expiry is strictly in the future. The refresh token itself is
    /// not rotated here.
    pub async fn refresh(&self, token: Option<&str>) -> Result<String> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(Error::MissingRefreshToken),
        };

        let records = self.store.refresh_tokens().await.map_err(internal)?;
        let mut matched: Option<RefreshTokenRecord> = None;
        for record in records {
            if password::verify(token, &record.token_hash)? {
                matched = Some(record);
                break;
            }
        }

        let record = matched.ok_or(Error::InvalidOrExpiredRefreshToken)?;
        if !record.is_live(Utc::now()) {
            return Err(Error::InvalidOrExpiredRefreshToken);
        }

        // A record whose owner is gone is as good as expired
        let user = self
            .store
            .find_user_by_id(record.user_id)
            .await
            .map_err(internal)?
            .ok_or(Error::InvalidOrExpiredRefreshToken)?;

        let access_token = self.sign_access_token(&user)?;
        debug!(user_id = user.id, "access token refreshed");
        Ok(access_token)
    }

    /// Verify a bearer access token; any failure is `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<AccessClaims> {
        access::verify(token, self.config.jwt_secret.expose()).map_err(|_| Error::Unauthenticated)
    }

    /// Flat allow-list role check for one operation.
    pub fn authorize(&self, claims: &AccessClaims, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&claims.role) {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }

    /// Public fields for the authenticated caller.
    pub async fn user_profile(&self, id: i64) -> Result<PublicUser> {
        self.store
            .find_user_by_id(id)
            .await
            .map_err(internal)?
            .map(|u| PublicUser::from(&u))
            .ok_or(Error::Unauthenticated)
    }

    /// Public fields for every user, in creation order.
    pub async fn list_users(&self) -> Result<Vec<PublicUser>> {
        let users = self.store.list_users().await.map_err(internal)?;
        Ok(users.iter().map(PublicUser::from).collect())
    }

    /// Create the admin account unless its email is already registered.
    ///
    /// Idempotent: returns `None` (and leaves the existing user untouched)
    /// when the email is present, the created user otherwise.
    pub async fn seed_admin(&self, email: &str, password_plain: &str) -> Result<Option<PublicUser>> {
        if self
            .store
            .find_user_by_email(email)
            .await
            .map_err(internal)?
            .is_some()
        {
            info!("admin user already exists, skipping seed");
            return Ok(None);
        }

        let password_hash = password::hash(password_plain, self.config.bcrypt_cost)?;
        let user = match self
            .store
            .create_user(NewUser {
                email: email.to_owned(),
                password_hash,
                role: Role::Admin,
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::Conflict(_)) => return Ok(None),
            Err(e) => return Err(internal(e)),
        };

        info!(user_id = user.id, "seeded admin user");
        Ok(Some(PublicUser::from(&user)))
    }

    /// Mint an access token and a refresh token for the user, persisting
    /// only the refresh secret's hash.
    async fn open_session(&self, user: UserRecord) -> Result<Session> {
        let access_token = self.sign_access_token(&user)?;

        let secret = refresh::generate_secret();
        let token_hash = password::hash(&secret, self.config.bcrypt_cost)?;
        let now = Utc::now();
        self.store
            .insert_refresh_token(RefreshTokenRecord {
                token_hash,
                user_id: user.id,
                expires_at: now + Duration::days(self.config.refresh_token_ttl_days),
                created_at: now,
            })
            .await
            .map_err(internal)?;

        Ok(Session {
            user: PublicUser::from(&user),
            access_token,
            refresh_token: secret,
        })
    }

    fn sign_access_token(&self, user: &UserRecord) -> Result<String> {
        Ok(access::sign(
            user.id,
            user.role,
            self.config.jwt_secret.expose(),
            Duration::seconds(self.config.access_token_ttl_secs),
        )?)
    }
}

fn internal(e: StoreError) -> Error {
    Error::Internal(e.to_string())
}
