//! Credential primitives for the M-Motors backend
//!
//! Password hashing, signed access-token claims, and refresh-token secret
//! generation. This crate is a standalone library with no persistence or
//! HTTP dependency — the session manager composes these over a store.
//!
//! Credential flow:
//! 1. Registration hashes the password via `password::hash`
//! 2. Login checks it via `password::verify`
//! 3. Both mint an access token via `access::sign` (stateless, short-lived)
//! 4. Both mint a refresh secret via `refresh::generate_secret`; only its
//!    `password::hash` output is ever persisted
//! 5. Refresh validates the presented secret via `password::verify` against
//!    stored hashes and calls `access::sign` again

pub mod access;
pub mod error;
pub mod password;
pub mod refresh;

pub use access::AccessClaims;
pub use error::{Error, Result};
