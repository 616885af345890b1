//! Appointment records and their display projection
//!
//! [`AppointmentRecord`] mirrors what `GET /api/appointments/my` returns;
//! [`AppointmentRow`] is the table/modal shape derived from it by
//! [`project_appointment`]. Every page that lists appointments goes through the
//! same projection.

use crate::status::{AppointmentStatus, Severity};
use crate::time::{format_date, format_time, timestamp};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when an appointment has no nested doctor
pub const UNASSIGNED_DOCTOR: &str = "Unassigned";
/// Shown when an appointment has no nested patient
pub const UNKNOWN_PATIENT: &str = "Unknown";
/// Shown when the backend has not issued a code
pub const MISSING_CODE: &str = "N/A";
/// Shown in place of a date or time the backend did not send
pub const MISSING_DATE: &str = "N/A";

/// Backend appointment identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

impl AppointmentId {
    /// Raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for AppointmentId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Nested patient/doctor object embedded in an appointment record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Appointment as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: AppointmentId,
    #[serde(default)]
    pub appointment_code: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub patient: Option<PersonRef>,
    #[serde(default)]
    pub doctor: Option<PersonRef>,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    /// Missing or unparsable values read as `None`
    #[serde(default, with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AppointmentRecord {
    /// Patient identifier from the flat field or the nested object
    #[must_use]
    pub fn patient_key(&self) -> Option<&str> {
        self.patient_id
            .as_deref()
            .or_else(|| self.patient.as_ref().and_then(|p| p.id.as_deref()))
    }
}

/// Display row for appointment tables and the details modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub id: AppointmentId,
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub patient_contact: Option<String>,
    pub doctor_name: String,
    pub date_display: String,
    pub time_display: String,
    pub problem: String,
    pub severity: Severity,
    pub status: AppointmentStatus,
    pub appointment_code: String,
    pub cancellation_reason: Option<String>,
    pub duration: Option<String>,
    pub medical_history: Option<String>,
    pub result: Option<String>,
    /// Original timestamp; date filters use this, never the display string
    pub created_at: Option<DateTime<Utc>>,
}

impl AppointmentRow {
    /// Calendar date of the appointment in `tz`, if the backend sent one
    #[must_use]
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.created_at.map(|at| at.with_timezone(tz).date_naive())
    }

    /// Patients may cancel only while the appointment is pending
    #[inline]
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }

    /// Doctors confirm or reject only pending appointments
    #[inline]
    #[must_use]
    pub fn awaits_decision(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Project one backend record into a display row, rendering times in `tz`.
pub fn project_appointment<Tz>(record: &AppointmentRecord, tz: &Tz) -> AppointmentRow
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let patient = record.patient.as_ref();
    let doctor = record.doctor.as_ref();

    AppointmentRow {
        id: record.id.clone(),
        patient_id: record.patient_key().map(str::to_string),
        patient_name: non_blank(patient.and_then(|p| p.name.as_deref()))
            .unwrap_or(UNKNOWN_PATIENT)
            .to_string(),
        patient_contact: patient.and_then(|p| p.contact.clone()),
        doctor_name: non_blank(doctor.and_then(|d| d.name.as_deref()))
            .unwrap_or(UNASSIGNED_DOCTOR)
            .to_string(),
        date_display: record
            .created_at
            .map_or_else(|| MISSING_DATE.to_string(), |at| format_date(&at, tz)),
        time_display: record
            .created_at
            .map_or_else(|| MISSING_DATE.to_string(), |at| format_time(&at, tz)),
        problem: record.problem.clone(),
        severity: record
            .severity
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        status: record.status.clone(),
        appointment_code: non_blank(record.appointment_code.as_deref())
            .unwrap_or(MISSING_CODE)
            .to_string(),
        cancellation_reason: record.cancellation_reason.clone(),
        duration: record.duration.clone(),
        medical_history: record.medical_history.clone(),
        result: record.result.clone(),
        created_at: record.created_at,
    }
}

/// Project a full listing, preserving backend order.
pub fn project_appointments<Tz>(records: &[AppointmentRecord], tz: &Tz) -> Vec<AppointmentRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    records.iter().map(|r| project_appointment(r, tz)).collect()
}

/// The `count` most recent rows, newest first; undated rows sort last.
#[must_use]
pub fn most_recent(rows: &[AppointmentRow], count: usize) -> Vec<AppointmentRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(count);
    sorted
}
