//! HMS Core - domain model of the hospital front desk
//!
//! Pure, I/O-free building blocks shared by the client and the view-models:
//! - Roles, sessions and the authentication state
//! - Backend records and their display projections
//! - Client-side filters for appointment lists
//! - Appointment status transition rules
//! - Form validation for auth, booking and rejection
//!
//! # Example
//!
//! ```rust
//! use hms_core::prelude::*;
//! use chrono::Utc;
//!
//! let json = r#"{"id":"42","problem":"headache","status":"pending",
//!                "created_at":"2025-03-20T09:00:00Z"}"#;
//! let record: AppointmentRecord = serde_json::from_str(json).unwrap();
//! let rows = project_appointments(&[record], &Utc);
//!
//! let pending = AppointmentFilter::new()
//!     .with_status(StatusFilter::Only(AppointmentStatus::Pending));
//! assert_eq!(pending.apply(&rows, &Utc::now()).len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod appointment;
pub mod booking;
pub mod error;
pub mod filter;
pub mod people;
pub mod role;
pub mod session;
pub mod stats;
pub mod status;
pub mod time;
pub mod wire;

// Re-exports for convenience
pub use appointment::{
    most_recent, project_appointment, project_appointments, AppointmentId, AppointmentRecord,
    AppointmentRow, PersonRef,
};
pub use booking::{BookingDetails, BookingRequest, TIME_SLOTS};
pub use error::{TransitionError, ValidationError};
pub use filter::{AppointmentFilter, DateFilter, StatusFilter};
pub use people::{
    build_roster, specialties, DoctorProfileFields, DoctorQuery, DoctorRecord, PatientRecord,
    RosterEntry,
};
pub use role::{AuthState, Role};
pub use session::{AuthToken, Session, UserProfile};
pub use stats::{doctor_stats, patient_stats, StatCard};
pub use status::{allowed_transitions, validate_transition, AppointmentStatus, Severity};
pub use wire::{
    AuthResponse, ConfirmRequest, DoctorCredentials, DoctorRegistration, PatientCredentials,
    PatientRegistration, RejectRequest, StatusUpdate,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with HMS Core
    pub use crate::{
        project_appointments, AppointmentFilter, AppointmentId, AppointmentRecord, AppointmentRow,
        AppointmentStatus, AuthState, DateFilter, Role, Session, Severity, StatusFilter,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
