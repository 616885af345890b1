//! Error types for HMS Core
//!
//! Covers the failures that can be decided without talking to the backend:
//! - Client-side form validation
//! - Illegal appointment status transitions
//! - Unrecognized enum spellings (roles, filters, severities)

use crate::status::AppointmentStatus;
use chrono::NaiveDate;

/// Client-side validation failure
///
/// Raised before any request is sent; the message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty or whitespace-only
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Email address is malformed
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    /// Rejection reason is empty or whitespace-only
    #[error("a reason is required to reject an appointment")]
    EmptyRejectionReason,

    /// Preferred date lies before today
    #[error("preferred date {0} is in the past")]
    DateInPast(NaiveDate),

    /// Preferred time is not one of the clinic's slots
    #[error("'{0}' is not an available time slot")]
    InvalidTimeSlot(String),

    /// Value does not name a known variant
    #[error("unrecognized {kind}: '{value}'")]
    Unrecognized { kind: &'static str, value: String },
}

impl ValidationError {
    /// Create an unrecognized-value error
    #[inline]
    pub fn unrecognized(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unrecognized {
            kind,
            value: value.into(),
        }
    }
}

/// Illegal appointment status transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Target status is not reachable from the current one
    #[error("cannot move appointment from {from} to {to}")]
    Illegal {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

/// Trim `value` and fail with [`ValidationError::Required`] when nothing is left.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}

/// Minimal email shape check: something on both sides of a single `@`.
pub fn require_email(value: &str) -> Result<&str, ValidationError> {
    let email = require("email", value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank() {
        assert_eq!(
            require("problem", "   "),
            Err(ValidationError::Required { field: "problem" })
        );
        assert_eq!(require("problem", " headache "), Ok("headache"));
    }

    #[test]
    fn email_shape() {
        assert!(require_email("alice@clinic.org").is_ok());
        assert!(matches!(
            require_email("alice.clinic.org"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            require_email("@clinic.org"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            require_email(""),
            Err(ValidationError::Required { field: "email" })
        ));
    }

    #[test]
    fn transition_error_display() {
        let err = TransitionError::Illegal {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "cannot move appointment from completed to pending"
        );
    }
}
