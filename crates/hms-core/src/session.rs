//! Session data: bearer token plus the logged-in user's profile
//!
//! A [`Session`] can only be built from both halves, so a token without a
//! user (or the reverse) is unrepresentable in memory.

use crate::error::{require, ValidationError};
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token issued by the backend
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a non-blank token string
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        require("access token", &raw)?;
        Ok(Self(raw))
    }

    /// Raw token value, for the `Authorization` header and persistence only
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// User profile returned by login/registration and persisted alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier (UUID string)
    pub id: String,
    /// Display name
    pub name: String,
    /// Account type discriminator
    #[serde(rename = "type")]
    pub role: Role,
    /// Doctor login identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Patient login identifier (phone or other contact)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Doctor qualification, when provided at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
}

impl UserProfile {
    /// Login identifier for display: email for doctors, contact for patients
    #[must_use]
    pub fn handle(&self) -> &str {
        let handle = match self.role {
            Role::Doctor => self.email.as_deref(),
            Role::Patient => self.contact.as_deref(),
        };
        handle.unwrap_or("")
    }
}

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token
    pub token: AuthToken,
    /// Profile of the logged-in user
    pub user: UserProfile,
}

impl Session {
    /// Pair a token with its user
    #[inline]
    #[must_use]
    pub fn new(token: AuthToken, user: UserProfile) -> Self {
        Self { token, user }
    }

    /// Role of the logged-in user
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejects_blank() {
        assert!(AuthToken::new("  ").is_err());
        assert_eq!(AuthToken::new("abc").unwrap().expose(), "abc");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret-value").unwrap();
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[test]
    fn profile_parses_backend_user_blob() {
        let json = r#"{"id":"9b1d","name":"Alice","email":"alice@clinic.org","qualification":null,"type":"doctor"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.handle(), "alice@clinic.org");
        assert_eq!(user.qualification, None);
    }

    #[test]
    fn profile_without_type_is_rejected() {
        let json = r#"{"id":"1","name":"Bob","contact":"555-0100"}"#;
        assert!(serde_json::from_str::<UserProfile>(json).is_err());
    }
}
