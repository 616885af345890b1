//! User-facing outcome messages

use crate::appointments::{MutationOutcome, LOAD_FAILED};
use crate::error::{AppError, AppResult};
use hms_client::ApiError;
use std::fmt;

/// What the page shows after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Inline message next to the form
    Banner(String),
    /// Blocking alert
    Alert(String),
    /// Operation succeeded
    Success(String),
}

impl Notice {
    /// Notice for a failed operation
    ///
    /// Input problems stay inline; everything else interrupts.
    #[must_use]
    pub fn from_error(err: &AppError, fallback: &str) -> Self {
        let text = err.user_message(fallback);
        match err {
            AppError::Validation(_)
            | AppError::Transition(_)
            | AppError::Busy(_)
            | AppError::Api(ApiError::Invalid(_)) => Notice::Banner(text),
            _ => Notice::Alert(text),
        }
    }

    /// Notice for either outcome of `result`
    #[must_use]
    pub fn from_result<T>(result: &AppResult<T>, success: &str, fallback: &str) -> Self {
        match result {
            Ok(_) => Notice::Success(success.to_string()),
            Err(err) => Self::from_error(err, fallback),
        }
    }

    /// Alert for a list that could not be refreshed
    #[must_use]
    pub fn reload_failed(err: &AppError) -> Self {
        Notice::Alert(err.user_message(LOAD_FAILED))
    }

    /// Notices after an appointment mutation
    ///
    /// The mutation's own outcome comes first. An applied mutation whose
    /// reload failed adds an alert.
    #[must_use]
    pub fn for_mutation(
        result: &AppResult<MutationOutcome>,
        success: &str,
        fallback: &str,
    ) -> Vec<Self> {
        let mut notices = vec![Self::from_result(result, success, fallback)];
        if let Some(err) = result.as_ref().ok().and_then(MutationOutcome::reload_error) {
            notices.push(Self::reload_failed(err));
        }
        notices
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Notice::Banner(t) | Notice::Alert(t) | Notice::Success(t) => t,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::Success(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_core::ValidationError;

    #[test]
    fn server_failures_alert_with_detail() {
        let result: AppResult<()> = Err(ApiError::from_status(409, Some("Already confirmed".into())).into());
        let notice = Notice::from_result(&result, "Confirmed", "Failed to confirm appointment");
        assert_eq!(notice, Notice::Alert("Already confirmed".into()));
        assert!(notice.is_failure());
    }

    #[test]
    fn validation_failures_stay_inline() {
        let err = AppError::from(ValidationError::Required { field: "problem" });
        assert_eq!(
            Notice::from_error(&err, "Booking failed"),
            Notice::Banner("problem is required".into())
        );
    }

    #[test]
    fn client_side_rejection_stays_inline() {
        let err = AppError::from(ApiError::from(ValidationError::EmptyRejectionReason));
        assert!(matches!(Notice::from_error(&err, "Failed"), Notice::Banner(_)));
    }

    #[test]
    fn unreachable_uses_fallback() {
        let err = AppError::from(ApiError::Unreachable("connection refused".into()));
        assert_eq!(
            Notice::from_error(&err, "Failed to load appointments").text(),
            "Failed to load appointments"
        );
    }
}
