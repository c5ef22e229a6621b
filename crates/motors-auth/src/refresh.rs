//! Refresh-token secret generation
//!
//! A refresh token is an opaque 256-bit random value encoded as URL-safe
//! base64 without padding. The plaintext goes to the caller exactly once at
//! issuance; the store only ever sees its bcrypt hash.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// Byte length of the random secret (256 bits).
const SECRET_LEN: usize = 32;

/// Generate a cryptographically random refresh-token secret.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_url_safe_base64() {
        let secret = generate_secret();
        // 32 bytes → 43 base64url chars (no padding)
        assert_eq!(secret.len(), 43);
        assert!(
            secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "secret must be URL-safe base64 (no padding): {secret}"
        );
    }

    #[test]
    fn secrets_are_unique() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b, "two secrets must not collide");
    }

    #[test]
    fn secret_decodes_to_full_entropy() {
        let secret = generate_secret();
        let decoded = URL_SAFE_NO_PAD.decode(&secret).expect("valid base64url");
        assert_eq!(decoded.len(), SECRET_LEN);
    }

    #[test]
    fn secret_fits_bcrypt_input_limit() {
        // bcrypt truncates input beyond 72 bytes; the secret must stay under
        assert!(generate_secret().len() < 72);
    }
}
