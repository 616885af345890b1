//! Error types for the REST client
//!
//! Three ways a call can fail, as the pages see it:
//! - The server never answered (`Unreachable`)
//! - The server answered with an error status, usually carrying a `detail`
//! - The server answered with something we could not decode
//!
//! Requests whose input fails local validation are refused before sending
//! (`Invalid`); no server status is involved.

use hms_core::ValidationError;

/// REST call failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response: connection refused, DNS failure, timeout
    #[error("cannot reach server: {0}")]
    Unreachable(String),

    /// HTTP 401; the bearer token was missing, invalid or expired
    #[error("unauthorized: {}", .detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// Any other 4xx/5xx
    #[error("server rejected request ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Client misconfiguration (bad base URL, TLS setup)
    #[error("client configuration error: {0}")]
    Config(String),

    /// Request input failed validation; nothing was sent
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ApiError {
    /// Build the error for a non-success status
    #[must_use]
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        if status == 401 {
            Self::Unauthorized { detail }
        } else {
            Self::Rejected { status, detail }
        }
    }

    /// Whether the session should be treated as invalid
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether no response arrived at all
    #[inline]
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    /// Server-provided `detail`, if any
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text for a banner or alert: the server's message verbatim, else `fallback`
    ///
    /// Local validation failures describe themselves.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            other => other.detail().unwrap_or(fallback).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_is_unauthorized() {
        let err = ApiError::from_status(401, Some("Could not validate credentials".into()));
        assert!(err.is_unauthorized());
        assert!(!ApiError::from_status(403, None).is_unauthorized());
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let err = ApiError::from_status(409, Some("Appointment already confirmed".into()));
        assert_eq!(err.user_message("Failed"), "Appointment already confirmed");

        let err = ApiError::from_status(500, None);
        assert_eq!(err.user_message("Failed"), "Failed");

        let err = ApiError::Unreachable("connection refused".into());
        assert_eq!(err.user_message("Failed"), "Failed");
        assert!(err.is_unreachable());
    }

    #[test]
    fn invalid_input_carries_no_status() {
        let err = ApiError::from(ValidationError::EmptyRejectionReason);
        assert_eq!(err.detail(), None);
        assert!(!err.is_unauthorized());
        assert_eq!(
            err.user_message("Failed to reject appointment"),
            ValidationError::EmptyRejectionReason.to_string()
        );
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::from_status(404, Some("Appointment not found".into()));
        assert_eq!(
            err.to_string(),
            "server rejected request (404): Appointment not found"
        );
    }
}
