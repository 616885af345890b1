//! Booking wizard
//!
//! `SelectDoctor -> EnterDetails -> Confirmation`. Going back from
//! `EnterDetails` discards the details; `Confirmation` is final until
//! [`BookingWizard::reset`].

use crate::context::AppContext;
use crate::directory::DoctorDirectory;
use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use hms_core::appointment::MISSING_CODE;
use hms_core::{BookingDetails, DoctorRecord};
use std::sync::Arc;
use tracing::info;

/// Current wizard step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    SelectDoctor,
    EnterDetails {
        doctor: DoctorRecord,
        details: BookingDetails,
    },
    Confirmation {
        doctor: DoctorRecord,
        details: BookingDetails,
        appointment_code: String,
    },
}

impl WizardStep {
    /// Step number shown in the progress indicator, 1-based
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectDoctor => 1,
            WizardStep::EnterDetails { .. } => 2,
            WizardStep::Confirmation { .. } => 3,
        }
    }
}

/// Patient-side booking flow
#[derive(Debug)]
pub struct BookingWizard {
    ctx: Arc<AppContext>,
    directory: DoctorDirectory,
    step: WizardStep,
}

impl BookingWizard {
    #[must_use]
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            directory: DoctorDirectory::new(),
            step: WizardStep::SelectDoctor,
        }
    }

    #[must_use]
    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Doctor list for the first step
    #[must_use]
    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut DoctorDirectory {
        &mut self.directory
    }

    pub async fn load_doctors(&mut self) -> AppResult<usize> {
        self.directory.load(&self.ctx).await
    }

    /// Pick a doctor and move to the details form, prefilled from the session
    pub fn select_doctor(&mut self, doctor_id: &str) -> AppResult<()> {
        if !matches!(self.step, WizardStep::SelectDoctor) {
            return Err(AppError::InvalidStep {
                expected: "select doctor",
            });
        }
        let doctor = self
            .directory
            .find(doctor_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownDoctor(doctor_id.to_string()))?;
        let user = self.ctx.require_session()?.user;
        let details =
            BookingDetails::for_patient(user.name, user.contact.unwrap_or_default());
        self.step = WizardStep::EnterDetails { doctor, details };
        Ok(())
    }

    /// Editable details; only on the details step
    pub fn details_mut(&mut self) -> AppResult<&mut BookingDetails> {
        match &mut self.step {
            WizardStep::EnterDetails { details, .. } => Ok(details),
            _ => Err(AppError::InvalidStep { expected: "details" }),
        }
    }

    /// Return to doctor selection, dropping entered details
    pub fn back(&mut self) -> AppResult<()> {
        match self.step {
            WizardStep::EnterDetails { .. } => {
                self.step = WizardStep::SelectDoctor;
                Ok(())
            }
            _ => Err(AppError::InvalidStep { expected: "details" }),
        }
    }

    /// Validate, post the booking and move to the confirmation
    ///
    /// On failure the wizard stays on the details step with the input intact.
    pub async fn submit(&mut self, today: NaiveDate) -> AppResult<&str> {
        let WizardStep::EnterDetails { doctor, details } = &self.step else {
            return Err(AppError::InvalidStep { expected: "details" });
        };
        let forward = self.ctx.config().booking.forward_schedule;
        let request = details.to_request(&doctor.id, today, forward)?;

        let record = self
            .ctx
            .call(|api, token| async move { api.book_appointment(&token, &request).await })
            .await?;
        let appointment_code = record
            .appointment_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| MISSING_CODE.to_string());
        info!(id = %record.id, code = %appointment_code, "appointment booked");

        let WizardStep::EnterDetails { doctor, details } =
            std::mem::replace(&mut self.step, WizardStep::SelectDoctor)
        else {
            return Err(AppError::InvalidStep { expected: "details" });
        };
        self.step = WizardStep::Confirmation {
            doctor,
            details,
            appointment_code,
        };
        match &self.step {
            WizardStep::Confirmation {
                appointment_code, ..
            } => Ok(appointment_code),
            _ => Err(AppError::InvalidStep {
                expected: "confirmation",
            }),
        }
    }

    /// Doctor name and code once booked
    #[must_use]
    pub fn confirmation(&self) -> Option<(&DoctorRecord, &str)> {
        match &self.step {
            WizardStep::Confirmation {
                doctor,
                appointment_code,
                ..
            } => Some((doctor, appointment_code.as_str())),
            _ => None,
        }
    }

    /// Start over; the loaded doctor list is kept
    pub fn reset(&mut self) {
        self.step = WizardStep::SelectDoctor;
    }
}
