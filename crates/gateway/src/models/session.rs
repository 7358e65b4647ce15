//! Session-related types.
//!
//! Types exchanged with the remote auth API and persisted by the
//! client-side session store.

use serde::{Deserialize, Serialize};

/// User identity carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// Bearer token plus profile representing a logged-in client.
///
/// Matches the `data` payload of the remote login/signup responses.
/// Token presence alone implies authenticated state; there is no
/// client-side TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Storage keys for persisted credentials.
pub mod keys {
    /// Key for the bearer token string.
    pub const TOKEN: &str = "token";

    /// Key for the serialized user profile.
    pub const USER: &str = "user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserialize_from_wire() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "token": "abcdef0123456789",
            "user": { "_id": "u1", "name": "Pat Reader", "email": "pat@example.com" }
        }))
        .unwrap();

        assert_eq!(session.user.id, "u1");
        assert_eq!(session.user.email, "pat@example.com");
    }

    #[test]
    fn test_profile_name_defaults_empty() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "_id": "u2",
            "email": "anon@example.com"
        }))
        .unwrap();

        assert!(profile.name.is_empty());
    }
}
