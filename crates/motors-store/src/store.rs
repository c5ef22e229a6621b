//! Store abstraction consumed by the session manager
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Arc<dyn SessionStore>`): the manager and the HTTP service hold the
//! store behind the trait, never a concrete type.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::records::{NewUser, RefreshTokenRecord, UserRecord};

/// Abstraction over user and refresh-token persistence.
///
/// All operations are point reads/writes; nothing here spans a transaction.
/// The check-then-act sequence in registration ("is the email taken?" then
/// "create the user") therefore races under concurrency: `create_user` is
/// the authoritative uniqueness check and the loser gets a conflict.
pub trait SessionStore: Send + Sync {
    /// Look up a user by exact email.
    fn find_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + 'a>>;

    /// Look up a user by id.
    fn find_user_by_id(
        &self,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + '_>>;

    /// Create a user, enforcing email uniqueness.
    ///
    /// Returns `StoreError::Conflict` if the email is already present.
    fn create_user(
        &self,
        new: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<UserRecord>> + Send + '_>>;

    /// All users, in creation order.
    fn list_users(&self) -> Pin<Box<dyn Future<Output = Result<Vec<UserRecord>>> + Send + '_>>;

    /// Persist a refresh-token record.
    fn insert_refresh_token(
        &self,
        record: RefreshTokenRecord,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Snapshot of all stored refresh-token records, expired ones included.
    fn refresh_tokens(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RefreshTokenRecord>>> + Send + '_>>;

    /// Delete records whose expiry is at or before `now`; returns how many
    /// were removed. Live records are never touched.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = Result<usize>> + Send + '_>>;

    /// Cheap liveness check for the health endpoint.
    fn ping(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
