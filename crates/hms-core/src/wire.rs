//! Request and response bodies of the auth and appointment endpoints
//!
//! Forms validate themselves before they are sent; a validation failure never
//! reaches the network.

use crate::appointment::AppointmentId;
use crate::error::{require, require_email, ValidationError};
use crate::session::{AuthToken, Session, UserProfile};
use crate::status::AppointmentStatus;
use serde::{Deserialize, Serialize};

/// `{ access_token, user }` returned by login and registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserProfile,
}

impl AuthResponse {
    /// Turn the response into a session
    pub fn into_session(self) -> Result<Session, ValidationError> {
        Ok(Session::new(AuthToken::new(self.access_token)?, self.user))
    }
}

/// `POST /api/auth/login/doctor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorCredentials {
    pub email: String,
    pub password: String,
}

impl DoctorCredentials {
    /// Required fields and email shape
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_email(&self.email)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// `POST /api/auth/login/patient`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCredentials {
    pub contact: String,
    pub password: String,
}

impl PatientCredentials {
    /// Required fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("contact", &self.contact)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// `POST /api/auth/register/doctor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRegistration {
    pub secret_key: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub qualification: Option<String>,
}

impl DoctorRegistration {
    /// Required fields, email shape and a non-blank admin secret
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("admin secret key", &self.secret_key)?;
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// `POST /api/auth/register/patient`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRegistration {
    pub name: String,
    pub contact: String,
    pub password: String,
}

impl PatientRegistration {
    /// Required fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("contact", &self.contact)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// `PUT /api/appointments/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// `POST /api/appointments/confirm`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub appointment_id: AppointmentId,
}

/// `POST /api/appointments/reject`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRequest {
    pub appointment_id: AppointmentId,
    pub reason: String,
}

impl RejectRequest {
    /// Build a rejection; the reason must contain something besides whitespace
    pub fn new(appointment_id: AppointmentId, reason: &str) -> Result<Self, ValidationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyRejectionReason);
        }
        Ok(Self {
            appointment_id,
            reason: reason.to_string(),
        })
    }
}
