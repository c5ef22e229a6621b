//! Credential & session management for the M-Motors backend
//!
//! The `SessionManager` is the one component with security-relevant state
//! transitions: it registers users, authenticates credentials, issues
//! short-lived access tokens and longer-lived refresh tokens, and validates
//! refresh tokens against stored hashes.
//!
//! Session flow:
//! 1. `SessionManager::register()` / `login()` return a `Session` with the
//!    refresh secret's only plaintext appearance
//! 2. The boundary hands the secret back via `SessionManager::refresh()`
//!    to mint new access tokens until the stored record expires
//! 3. Request handlers gate on `verify()` + `authorize()`
//! 4. `spawn_purge_task()` sweeps expired records in the background

pub mod error;
pub mod manager;
pub mod purge;

pub use error::{Error, Result};
pub use manager::{PublicUser, Session, SessionConfig, SessionManager};
pub use motors_auth::AccessClaims;
pub use purge::spawn_purge_task;
