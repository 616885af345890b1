//! Doctor and patient records, directory search and the doctor's patient roster

use crate::appointment::{AppointmentRecord, MISSING_DATE};
use crate::time::{format_date, timestamp};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Doctor as returned by `GET /api/doctors` and `GET /api/doctors/me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Patient as returned by `GET /api/auth/me/patient`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub contact: String,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Editable doctor profile; also the `PUT /api/doctors/me` body
///
/// Missing backend fields become empty strings so the form always has a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfileFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub specialization: String,
    pub experience: String,
    pub department: String,
    pub bio: String,
}

impl DoctorProfileFields {
    /// Names accepted by [`DoctorProfileFields::set`]
    pub const FIELDS: [&'static str; 8] = [
        "name",
        "email",
        "phone",
        "qualification",
        "specialization",
        "experience",
        "department",
        "bio",
    ];

    /// Copy the editable subset out of a record
    #[must_use]
    pub fn from_record(record: &DoctorRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: record.name.clone(),
            email: text(&record.email),
            phone: text(&record.phone),
            qualification: text(&record.qualification),
            specialization: text(&record.specialization),
            experience: text(&record.experience),
            department: text(&record.department),
            bio: text(&record.bio),
        }
    }

    /// Set a field by form name; returns `false` for unknown names
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "qualification" => &mut self.qualification,
            "specialization" => &mut self.specialization,
            "experience" => &mut self.experience,
            "department" => &mut self.department,
            "bio" => &mut self.bio,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// Doctor directory filter used by the booking wizard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorQuery {
    /// Matches name or specialization, case-insensitive
    pub search: String,
    /// `None` means all specialties
    pub specialty: Option<String>,
}

impl DoctorQuery {
    /// Whether `doctor` passes
    #[must_use]
    pub fn matches(&self, doctor: &DoctorRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let specialization = doctor.specialization.as_deref();
        let matches_search = needle.is_empty()
            || doctor.name.to_lowercase().contains(&needle)
            || specialization.is_some_and(|s| s.to_lowercase().contains(&needle));
        let matches_specialty = match &self.specialty {
            None => true,
            Some(wanted) => specialization == Some(wanted.as_str()),
        };
        matches_search && matches_specialty
    }
}

/// Distinct non-empty specializations in first-seen order
#[must_use]
pub fn specialties(doctors: &[DoctorRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for spec in doctors.iter().filter_map(|d| d.specialization.as_deref()) {
        if !spec.is_empty() && !seen.iter().any(|s: &String| s == spec) {
            seen.push(spec.to_string());
        }
    }
    seen
}

/// One patient in a doctor's roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub patient_id: String,
    pub name: String,
    pub contact: String,
    pub appointment_count: usize,
    pub last_visit: String,
    pub last_visit_at: Option<DateTime<Utc>>,
}

impl RosterEntry {
    /// Name (case-insensitive) or contact (substring) search
    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.trim();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle.to_lowercase())
            || self.contact.contains(needle)
    }
}

/// Unique patients behind a doctor's appointments, in first-seen order.
///
/// Appointments without a patient id are skipped.
pub fn build_roster<Tz>(records: &[AppointmentRecord], tz: &Tz) -> Vec<RosterEntry>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut order: Vec<String> = Vec::new();
    let mut entries: HashMap<String, RosterEntry> = HashMap::new();

    for record in records {
        let Some(patient_id) = record.patient_key() else {
            continue;
        };
        let patient = record.patient.clone().unwrap_or_default();
        match entries.get_mut(patient_id) {
            Some(entry) => {
                entry.appointment_count += 1;
                if record.created_at > entry.last_visit_at {
                    entry.last_visit_at = record.created_at;
                }
            }
            None => {
                order.push(patient_id.to_string());
                entries.insert(
                    patient_id.to_string(),
                    RosterEntry {
                        patient_id: patient_id.to_string(),
                        name: patient.name.unwrap_or_default(),
                        contact: patient.contact.unwrap_or_default(),
                        appointment_count: 1,
                        last_visit: String::new(),
                        last_visit_at: record.created_at,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| entries.remove(&id))
        .map(|mut entry| {
            entry.last_visit = entry
                .last_visit_at
                .map_or_else(|| MISSING_DATE.to_string(), |at| format_date(&at, tz));
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(name: &str, specialization: Option<&str>) -> DoctorRecord {
        DoctorRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            specialization: specialization.map(str::to_string),
            ..DoctorRecord::default()
        }
    }

    fn appointment(id: &str, patient: &str, created_at: &str) -> AppointmentRecord {
        let json = format!(
            r#"{{"id":"{id}","problem":"x","status":"pending","created_at":"{created_at}",
                "patient":{{"id":"{patient}","name":"Patient {patient}","contact":"555-{patient}"}}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn directory_search_and_specialty() {
        let doctors = vec![
            doctor("Alice", Some("Cardiology")),
            doctor("Bob", Some("Dermatology")),
            doctor("Carol", None),
        ];

        let q = DoctorQuery {
            search: "cardio".to_string(),
            specialty: None,
        };
        assert_eq!(doctors.iter().filter(|d| q.matches(d)).count(), 1);

        let q = DoctorQuery {
            search: String::new(),
            specialty: Some("Dermatology".to_string()),
        };
        let hits: Vec<_> = doctors.iter().filter(|d| q.matches(d)).map(|d| d.name.as_str()).collect();
        assert_eq!(hits, vec!["Bob"]);

        assert_eq!(specialties(&doctors), vec!["Cardiology", "Dermatology"]);
    }

    #[test]
    fn roster_counts_and_keeps_latest_visit() {
        let records = vec![
            appointment("1", "7", "2025-03-01T10:00:00Z"),
            appointment("2", "8", "2025-03-02T10:00:00Z"),
            appointment("3", "7", "2025-03-05T10:00:00Z"),
        ];
        let roster = build_roster(&records, &Utc);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].patient_id, "7");
        assert_eq!(roster[0].appointment_count, 2);
        assert_eq!(roster[0].last_visit, "3/5/2025");
        assert_eq!(roster[1].appointment_count, 1);
    }

    #[test]
    fn undated_visits_do_not_hide_dated_ones() {
        let mut undated = appointment("1", "7", "2025-03-01T10:00:00Z");
        undated.created_at = None;
        let records = vec![undated.clone(), appointment("2", "7", "2025-03-04T10:00:00Z")];
        assert_eq!(build_roster(&records, &Utc)[0].last_visit, "3/4/2025");
        assert_eq!(build_roster(&[undated], &Utc)[0].last_visit, MISSING_DATE);
    }

    #[test]
    fn roster_search() {
        let roster = build_roster(&[appointment("1", "7", "2025-03-01T10:00:00Z")], &Utc);
        assert!(roster[0].matches("patient 7"));
        assert!(roster[0].matches("555"));
        assert!(!roster[0].matches("alice"));
    }

    #[test]
    fn profile_fields_set_by_name() {
        let mut fields = DoctorProfileFields::default();
        assert!(fields.set("phone", "555-0199"));
        assert!(!fields.set("salary", "1"));
        assert_eq!(fields.phone, "555-0199");
    }
}
