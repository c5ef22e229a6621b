//! Permission tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse permission tier attached to a user and carried in access-token
/// claims.
///
/// Authorization is a flat allow-list check per operation; no tier implies
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    User,
}

impl Default for Role {
    /// Tier assigned to self-registered accounts.
    fn default() -> Self {
        Role::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::User => "user",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn deserializes_lowercase() {
        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Client);
    }

    #[test]
    fn default_is_client() {
        assert_eq!(Role::default(), Role::Client);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Client.to_string(), "client");
        assert_eq!(Role::User.to_string(), "user");
    }
}
