//! Signed access-token claims
//!
//! Access tokens are stateless JWTs (HS256) carrying the owning user id and
//! role. Verification needs only the signing secret: signature plus expiry,
//! no store lookup. Anything else a caller wants to know about the user
//! requires a fresh lookup by `sub`.

use chrono::{Duration, Utc};
use common::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Claim set carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Owning user id
    pub sub: i64,
    /// Permission tier at issuance time
    pub role: Role,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Issue a signed access token for a user.
pub fn sign(user_id: i64, role: Role, secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user_id,
        role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Sign(e.to_string()))
}

/// Verify signature and expiry, returning the decoded claims.
pub fn verify(token: &str, secret: &str) -> Result<AccessClaims> {
    let data = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| Error::Verify(e.to_string()))?;
    Ok(data.claims)
}
