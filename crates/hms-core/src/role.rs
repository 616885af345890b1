//! User roles and authentication state

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account type carried in the persisted user profile (`type` discriminator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hospital staff; manages appointments assigned to them
    Doctor,
    /// Books appointments and views their own records
    Patient,
}

impl Role {
    /// All roles, in display order
    pub const ALL: [Role; 2] = [Role::Doctor, Role::Patient];

    /// Wire spelling
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(ValidationError::unrecognized("role", other)),
        }
    }
}

/// Who the client believes is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthState {
    /// No session
    Unauthenticated,
    /// Session present for the given role
    Authenticated(Role),
}

impl AuthState {
    /// Whether a session is present
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// Role of the current session, if any
    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            AuthState::Authenticated(role) => Some(*role),
            AuthState::Unauthenticated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_json() {
        let json = serde_json::to_string(&Role::Doctor).unwrap();
        assert_eq!(json, "\"doctor\"");
        let back: Role = serde_json::from_str("\"patient\"").unwrap();
        assert_eq!(back, Role::Patient);
    }

    #[test]
    fn role_parse_is_case_sensitive() {
        assert_eq!("doctor".parse::<Role>(), Ok(Role::Doctor));
        assert!("Doctor".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn auth_state_role() {
        assert_eq!(AuthState::Unauthenticated.role(), None);
        assert_eq!(AuthState::Authenticated(Role::Patient).role(), Some(Role::Patient));
        assert!(!AuthState::Unauthenticated.is_authenticated());
    }
}
