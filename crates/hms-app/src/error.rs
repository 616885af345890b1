//! Application error type

use crate::storage::StorageError;
use hms_client::ApiError;
use hms_core::{AppointmentId, TransitionError, ValidationError};

/// Errors surfaced by the view-models
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Form input rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Status change not permitted from the row's current status
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local session storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Operation needs a session and there is none
    #[error("not signed in")]
    NotAuthenticated,

    /// A mutation for this row is already in flight
    #[error("appointment {0} is already being updated")]
    Busy(AppointmentId),

    /// Booking wizard operation issued on the wrong step
    #[error("booking wizard is not on the {expected} step")]
    InvalidStep { expected: &'static str },

    /// Doctor id not present in the loaded directory
    #[error("unknown doctor: {0}")]
    UnknownDoctor(String),

    /// Appointment id not present in the loaded list
    #[error("unknown appointment: {0}")]
    UnknownAppointment(AppointmentId),
}

impl AppError {
    /// Whether the backend rejected the session token
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }

    /// Text for a banner or alert
    ///
    /// Server failures show the server's `detail` verbatim, else `fallback`.
    /// Local failures describe themselves.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.user_message(fallback),
            Self::Storage(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result alias for view-model operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_wins() {
        let err = AppError::from(ApiError::from_status(400, Some("Slot taken".into())));
        assert_eq!(err.user_message("Booking failed"), "Slot taken");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn local_errors_describe_themselves() {
        let err = AppError::from(ValidationError::EmptyRejectionReason);
        assert_eq!(err.user_message("fallback"), err.to_string());

        let err = AppError::Busy(AppointmentId::from("42"));
        assert_eq!(err.user_message("fallback"), "appointment 42 is already being updated");
    }

    #[test]
    fn unauthorized_is_detected_through_the_wrapper() {
        let err = AppError::from(ApiError::from_status(401, None));
        assert!(err.is_unauthorized());
        assert!(!AppError::NotAuthenticated.is_unauthorized());
    }
}
