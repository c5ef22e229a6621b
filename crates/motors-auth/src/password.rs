//! Password hashing and verification
//!
//! Wraps bcrypt behind the crate's error type. Hashing is deliberately slow
//! and salts each call independently. Refresh-token secrets go through the
//! same pair of functions as passwords: only a hash is ever persisted, and
//! comparison always runs the full verification rather than a byte compare.

use crate::error::{Error, Result};

/// Default work factor for production use.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a plaintext with a fresh random salt at the given work factor.
pub fn hash(plain: &str, cost: u32) -> Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| Error::Hash(e.to_string()))
}

/// Verify a plaintext against a stored hash.
///
/// Returns `Ok(false)` on a clean mismatch; `Err` only when the stored hash
/// string itself is malformed.
pub fn verify(plain: &str, hashed: &str) -> Result<bool> {
    bcrypt::verify(plain, hashed).map_err(|e| Error::Hash(e.to_string()))
}
