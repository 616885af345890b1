//! Sign-in and registration
//!
//! Forms are validated locally first; nothing is sent when validation fails.
//! On success the session is persisted and the router moves to the role's home.

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::router::Resolution;
use hms_core::{
    AuthResponse, DoctorCredentials, DoctorRegistration, PatientCredentials, PatientRegistration,
    Role,
};
use tracing::{info, warn};

/// Fallback message for a failed sign-in
pub const LOGIN_FAILED: &str = "Invalid email or password";
/// Fallback message for a failed registration
pub const REGISTRATION_FAILED: &str = "Registration failed";
/// Message when no response arrived
pub const SERVER_UNREACHABLE: &str =
    "Cannot connect to server. Please make sure the backend is running.";

/// Sign-in form; doctors use email, patients use their contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginForm {
    Doctor(DoctorCredentials),
    Patient(PatientCredentials),
}

impl LoginForm {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            LoginForm::Doctor(_) => Role::Doctor,
            LoginForm::Patient(_) => Role::Patient,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self {
            LoginForm::Doctor(c) => c.validate()?,
            LoginForm::Patient(c) => c.validate()?,
        }
        Ok(())
    }
}

/// Registration form; doctors additionally need the admin secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationForm {
    Doctor(DoctorRegistration),
    Patient(PatientRegistration),
}

impl RegistrationForm {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            RegistrationForm::Doctor(_) => Role::Doctor,
            RegistrationForm::Patient(_) => Role::Patient,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self {
            RegistrationForm::Doctor(f) => f.validate()?,
            RegistrationForm::Patient(f) => f.validate()?,
        }
        Ok(())
    }
}

/// Sign in and land on the role's home
pub async fn login(ctx: &AppContext, form: &LoginForm) -> AppResult<Resolution> {
    form.validate()?;
    let response = match form {
        LoginForm::Doctor(c) => ctx.api().login_doctor(c).await,
        LoginForm::Patient(c) => ctx.api().login_patient(c).await,
    };
    finish(ctx, form.role(), response.map_err(AppError::from))
}

/// Register, sign in and land on the role's home
pub async fn register(ctx: &AppContext, form: &RegistrationForm) -> AppResult<Resolution> {
    form.validate()?;
    let response = match form {
        RegistrationForm::Doctor(f) => ctx.api().register_doctor(f).await,
        RegistrationForm::Patient(f) => ctx.api().register_patient(f).await,
    };
    finish(ctx, form.role(), response.map_err(AppError::from))
}

fn finish(ctx: &AppContext, role: Role, response: AppResult<AuthResponse>) -> AppResult<Resolution> {
    let response = response.inspect_err(|e| warn!(%role, error = %e, "authentication failed"))?;
    let session = response.into_session()?;
    if session.role() != role {
        // Session role comes from the response, not the form
        warn!(expected = %role, actual = %session.role(), "account type differs from form");
    }
    info!(role = %session.role(), "authenticated");
    ctx.sign_in(session)
}

/// Message shown under the auth form
#[must_use]
pub fn failure_message(err: &AppError, fallback: &str) -> String {
    match err {
        AppError::Api(e) if e.is_unreachable() => SERVER_UNREACHABLE.to_string(),
        other => other.user_message(fallback),
    }
}
