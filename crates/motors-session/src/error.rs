//! Error taxonomy for the credential & session manager

use thiserror::Error;

/// Session-manager errors.
///
/// The first six variants are business outcomes the HTTP boundary maps to
/// typed client-facing responses. `Internal` covers store/hash/sign
/// failures; its detail is for logs, not for callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Registration conflict: the email is already taken.
    #[error("email already registered")]
    DuplicateEmail,

    /// Login failure. Deliberately ambiguous between "no such user" and
    /// "wrong password" so callers cannot enumerate accounts.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Refresh called with no token at all.
    #[error("refresh token missing")]
    MissingRefreshToken,

    /// Refresh token matched no live record.
    #[error("invalid or expired refresh token")]
    InvalidOrExpiredRefreshToken,

    /// Access-token verification failure (bad signature, malformed,
    /// expired).
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated caller whose role is not in the operation's allow-list.
    #[error("insufficient permissions")]
    Forbidden,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<motors_auth::Error> for Error {
    fn from(e: motors_auth::Error) -> Self {
        Error::Internal(e.to_string())
    }
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_leak_nothing_actionable() {
        // Unknown email and wrong password must read identically
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        // Invalid and expired refresh tokens share one message
        assert_eq!(
            Error::InvalidOrExpiredRefreshToken.to_string(),
            "invalid or expired refresh token"
        );
    }

    #[test]
    fn primitive_errors_fold_into_internal() {
        let err: Error = motors_auth::Error::Sign("boom".into()).into();
        assert!(matches!(err, Error::Internal(_)));
    }
}
