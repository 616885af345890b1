//! Booking form details and the request they produce

use crate::error::{require, ValidationError};
use crate::status::Severity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Half-hour slots offered by the clinic
pub const TIME_SLOTS: [&str; 18] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM",
    "12:00 PM", "12:30 PM", "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM",
    "04:00 PM", "04:30 PM", "05:00 PM", "05:30 PM", "06:00 PM", "06:30 PM",
];

/// Details entered on the second wizard step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDetails {
    pub problem: String,
    pub severity: Severity,
    pub duration: String,
    pub medical_history: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    /// Prefilled from the session, display only
    pub patient_name: String,
    /// Prefilled from the session, display only
    pub patient_phone: String,
}

impl BookingDetails {
    /// Blank details prefilled with the patient's name and phone
    #[must_use]
    pub fn for_patient(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            patient_name: name.into(),
            patient_phone: phone.into(),
            ..Self::default()
        }
    }

    /// Check the form against `today`
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        require("problem", &self.problem)?;
        if let Some(date) = self.preferred_date {
            if date < today {
                return Err(ValidationError::DateInPast(date));
            }
        }
        if let Some(time) = &self.preferred_time {
            if !TIME_SLOTS.contains(&time.as_str()) {
                return Err(ValidationError::InvalidTimeSlot(time.clone()));
            }
        }
        Ok(())
    }

    /// Build the `POST /api/appointments/` body after validating.
    ///
    /// Preferred date/time are only included when `forward_schedule` is set.
    pub fn to_request(
        &self,
        doctor_id: &str,
        today: NaiveDate,
        forward_schedule: bool,
    ) -> Result<BookingRequest, ValidationError> {
        self.validate(today)?;
        let optional = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        Ok(BookingRequest {
            doctor_id: doctor_id.to_string(),
            problem: self.problem.trim().to_string(),
            severity: self.severity,
            duration: optional(&self.duration),
            medical_history: optional(&self.medical_history),
            preferred_date: self.preferred_date.filter(|_| forward_schedule),
            preferred_time: self.preferred_time.clone().filter(|_| forward_schedule),
        })
    }
}

/// Body of `POST /api/appointments/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: String,
    pub problem: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn filled() -> BookingDetails {
        BookingDetails {
            problem: " headache ".to_string(),
            severity: Severity::Mild,
            duration: "2 days".to_string(),
            preferred_date: Some(today()),
            preferred_time: Some("10:30 AM".to_string()),
            ..BookingDetails::for_patient("Bob", "555-0100")
        }
    }

    #[test]
    fn problem_is_required() {
        let details = BookingDetails::for_patient("Bob", "555-0100");
        assert_eq!(
            details.validate(today()),
            Err(ValidationError::Required { field: "problem" })
        );
    }

    #[test]
    fn past_dates_and_odd_slots_are_rejected() {
        let mut details = filled();
        details.preferred_date = today().pred_opt();
        assert!(matches!(details.validate(today()), Err(ValidationError::DateInPast(_))));

        let mut details = filled();
        details.preferred_time = Some("01:00 PM".to_string());
        assert!(matches!(details.validate(today()), Err(ValidationError::InvalidTimeSlot(_))));
    }

    #[test]
    fn schedule_is_forwarded_only_on_request() {
        let kept_local = filled().to_request("d-1", today(), false).unwrap();
        assert_eq!(kept_local.problem, "headache");
        assert_eq!(kept_local.preferred_date, None);
        assert_eq!(kept_local.medical_history, None);

        let json = serde_json::to_value(&kept_local).unwrap();
        assert!(json.get("preferred_date").is_none());
        assert_eq!(json["severity"], "mild");
        assert_eq!(json["duration"], "2 days");

        let forwarded = filled().to_request("d-1", today(), true).unwrap();
        assert_eq!(forwarded.preferred_time.as_deref(), Some("10:30 AM"));
    }
}
