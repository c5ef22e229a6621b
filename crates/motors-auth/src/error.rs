//! Error types for credential primitives

/// Errors from hashing and token-signing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token signing failed: {0}")]
    Sign(String),

    #[error("token verification failed: {0}")]
    Verify(String),
}

/// Result alias for credential operations.
pub type Result<T> = std::result::Result<T, Error>;
