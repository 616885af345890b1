//! The backend seam
//!
//! Every page talks to the hospital backend through [`HospitalApi`]. The
//! production implementation is [`crate::HttpApi`]; tests substitute an
//! in-memory fake or (with the `mock` feature) a `mockall` mock.

use crate::error::ApiError;
use async_trait::async_trait;
use hms_core::{
    AppointmentId, AppointmentRecord, AuthResponse, AuthToken, BookingRequest, DoctorCredentials,
    DoctorProfileFields, DoctorRecord, DoctorRegistration, PatientCredentials, PatientRecord,
    PatientRegistration, StatusUpdate,
};

/// Hospital REST API as consumed by the front desk
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait HospitalApi: Send + Sync {
    /// `POST /api/auth/login/doctor`
    async fn login_doctor(&self, credentials: &DoctorCredentials) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/login/patient`
    async fn login_patient(&self, credentials: &PatientCredentials) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/register/doctor`
    async fn register_doctor(&self, form: &DoctorRegistration) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/register/patient`
    async fn register_patient(&self, form: &PatientRegistration) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/logout`
    async fn logout(&self, token: &AuthToken) -> Result<(), ApiError>;

    /// `GET /api/auth/me/patient`
    async fn my_patient_profile(&self, token: &AuthToken) -> Result<PatientRecord, ApiError>;

    /// `GET /api/appointments/my`; the server decides by role whose appointments these are
    async fn my_appointments(&self, token: &AuthToken) -> Result<Vec<AppointmentRecord>, ApiError>;

    /// `GET /api/appointments/code/{code}` (public)
    async fn appointment_by_code(&self, code: &str) -> Result<AppointmentRecord, ApiError>;

    /// `POST /api/appointments/`
    async fn book_appointment(
        &self,
        token: &AuthToken,
        request: &BookingRequest,
    ) -> Result<AppointmentRecord, ApiError>;

    /// `PUT /api/appointments/{id}`
    async fn update_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        update: &StatusUpdate,
    ) -> Result<AppointmentRecord, ApiError>;

    /// `POST /api/appointments/confirm`
    async fn confirm_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError>;

    /// `POST /api/appointments/reject`
    async fn reject_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        reason: &str,
    ) -> Result<AppointmentRecord, ApiError>;

    /// `DELETE /api/appointments/{id}`
    async fn cancel_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError>;

    /// `GET /api/doctors`
    async fn doctors(&self, token: &AuthToken) -> Result<Vec<DoctorRecord>, ApiError>;

    /// `GET /api/doctors/me`
    async fn my_doctor_profile(&self, token: &AuthToken) -> Result<DoctorRecord, ApiError>;

    /// `PUT /api/doctors/me`
    async fn update_doctor_profile(
        &self,
        token: &AuthToken,
        fields: &DoctorProfileFields,
    ) -> Result<DoctorRecord, ApiError>;
}
