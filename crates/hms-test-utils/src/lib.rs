//! Testing utilities for the HMS workspace
//!
//! Shared fixtures and an in-memory backend ([`FakeApi`]).

#![allow(missing_docs)]

pub mod fake;

pub use fake::{Endpoint, FakeApi, DOCTOR_SECRET};

use chrono::{DateTime, TimeZone, Utc};
use hms_core::{
    AppointmentId, AppointmentRecord, AppointmentStatus, DoctorRecord, PatientRecord, PersonRef,
    Role, UserProfile,
};

/// Password used by every fixture account
pub const PASSWORD: &str = "secret123";

/// A fixed "now": 2025-03-20 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
}

pub fn doctor_record(id: &str, name: &str, specialization: &str) -> DoctorRecord {
    DoctorRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(format!("{}@clinic.org", name.to_lowercase().replace(' ', "."))),
        phone: Some("555-0199".to_string()),
        qualification: Some("MBBS".to_string()),
        specialization: Some(specialization.to_string()),
        ..DoctorRecord::default()
    }
}

pub fn patient_record(id: &str, name: &str, contact: &str) -> PatientRecord {
    PatientRecord {
        id: id.to_string(),
        name: name.to_string(),
        contact: contact.to_string(),
        created_at: Some(fixed_now()),
    }
}

/// Session profile for a doctor account
pub fn doctor_user(record: &DoctorRecord) -> UserProfile {
    UserProfile {
        id: record.id.clone(),
        name: record.name.clone(),
        role: Role::Doctor,
        email: record.email.clone(),
        contact: None,
        qualification: record.qualification.clone(),
    }
}

/// Session profile for a patient account
pub fn patient_user(record: &PatientRecord) -> UserProfile {
    UserProfile {
        id: record.id.clone(),
        name: record.name.clone(),
        role: Role::Patient,
        email: None,
        contact: Some(record.contact.clone()),
        qualification: None,
    }
}

/// Appointment between `patient` and `doctor`, created at `created_at`
pub fn appointment(
    id: &str,
    patient: &PatientRecord,
    doctor: &DoctorRecord,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
) -> AppointmentRecord {
    AppointmentRecord {
        id: AppointmentId::from(id),
        appointment_code: Some(format!("APT-{id:0>4}")),
        patient_id: Some(patient.id.clone()),
        doctor_id: Some(doctor.id.clone()),
        patient: Some(PersonRef {
            id: Some(patient.id.clone()),
            name: Some(patient.name.clone()),
            contact: Some(patient.contact.clone()),
            email: None,
        }),
        doctor: Some(PersonRef {
            id: Some(doctor.id.clone()),
            name: Some(doctor.name.clone()),
            contact: doctor.phone.clone(),
            email: doctor.email.clone(),
        }),
        problem: "checkup".to_string(),
        severity: Some("moderate".to_string()),
        duration: None,
        medical_history: None,
        result: None,
        status,
        cancellation_reason: None,
        created_at: Some(created_at),
    }
}

/// Backend with one doctor (Alice, cardiology), two patients and three appointments
///
/// Appointments: `42` pending today with Bob, `43` confirmed today with Bob,
/// `44` completed ten days ago with Carol.
pub fn seeded_api() -> FakeApi {
    let api = FakeApi::new();
    let alice = doctor_record("d-1", "Alice", "Cardiology");
    let house = doctor_record("d-2", "Gregory House", "Diagnostics");
    let bob = patient_record("p-1", "Bob", "555-0100");
    let carol = patient_record("p-2", "Carol", "555-0101");
    let now = fixed_now();

    api.add_appointment(appointment("42", &bob, &alice, AppointmentStatus::Pending, now));
    api.add_appointment(appointment("43", &bob, &alice, AppointmentStatus::Confirmed, now));
    api.add_appointment(appointment(
        "44",
        &carol,
        &alice,
        AppointmentStatus::Completed,
        now - chrono::Duration::days(10),
    ));
    api.add_doctor(alice, PASSWORD);
    api.add_doctor(house, PASSWORD);
    api.add_patient(bob, PASSWORD);
    api.add_patient(carol, PASSWORD);
    api.set_now(now);
    api
}
