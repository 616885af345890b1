//! Appointment status, severity and the status transition rules
//!
//! Statuses are compared exactly as the backend spells them. A spelling that
//! is not one of the four known statuses is kept verbatim in
//! [`AppointmentStatus::Other`] rather than normalized.

use crate::error::{TransitionError, ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Appointment lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked, awaiting the doctor
    Pending,
    /// Accepted by the doctor
    Confirmed,
    /// Visit done
    Completed,
    /// Cancelled by the patient or rejected by the doctor
    Cancelled,
    /// Any other spelling the backend sent
    Other(String),
}

impl AppointmentStatus {
    /// The four known statuses
    pub const KNOWN: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// Parse a wire spelling; case-sensitive, never fails
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire spelling
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// No transition leaves this status
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Statuses reachable from `from` through a doctor's status update.
pub fn allowed_transitions(from: &AppointmentStatus) -> Vec<AppointmentStatus> {
    use AppointmentStatus::*;
    match from {
        Pending => vec![Confirmed, Completed, Cancelled],
        Confirmed => vec![Completed, Cancelled],
        Completed | Cancelled => vec![],
        // Unknown statuses came from the server; let the server judge.
        Other(_) => vec![Pending, Confirmed, Completed, Cancelled],
    }
}

/// Validates a status transition before it is sent.
pub fn validate_transition(
    from: &AppointmentStatus,
    to: &AppointmentStatus,
) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

/// Patient-reported severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor discomfort
    Mild,
    /// Default when the patient does not say
    #[default]
    Moderate,
    /// Needs prompt attention
    Severe,
}

impl Severity {
    /// Wire spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(ValidationError::unrecognized("severity", other)),
        }
    }
}
