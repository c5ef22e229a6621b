//! Persisted record types

use chrono::{DateTime, Utc};
use common::Role;
use serde::{Deserialize, Serialize};

/// A persisted user row.
///
/// `password_hash` is a bcrypt string; the plaintext never reaches the
/// store. Users are created at registration (or admin seeding) and never
/// deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user; the store assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A persisted refresh-token row.
///
/// Only the bcrypt hash of the secret is stored; the plaintext exists
/// client-side only. Many rows may reference the same user (one per
/// device/session).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Whether the record is still exchangeable at `now`.
    ///
    /// Expiry is strict: a record whose `expires_at` equals `now` is
    /// already expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
