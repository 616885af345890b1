//! Appointment list view-model
//!
//! Backs the doctor's appointments page and the patient's "my appointments"
//! page. The backend decides which appointments the caller sees; this module
//! projects them into rows, filters them locally and runs mutations.
//!
//! Mutation protocol:
//! - one request per mutation, then a full reload (no local patching)
//! - on failure the rows are left exactly as they were
//! - a failed reload after an applied mutation is reported, not swallowed
//!   ([`MutationOutcome::AppliedButStale`])
//! - one mutation per row at a time; a second one gets [`AppError::Busy`]
//!
//! Loads are numbered. A response that arrives after a newer load has been
//! applied is dropped.

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, TimeZone};
use dashmap::DashSet;
use hms_client::ApiError;
use hms_core::{
    project_appointment, project_appointments, validate_transition, AppointmentFilter,
    AppointmentId, AppointmentRecord, AppointmentRow, AppointmentStatus, RejectRequest,
    StatusUpdate, TransitionError,
};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fallback text when the appointment list cannot be loaded
pub const LOAD_FAILED: &str = "Failed to load appointments";

/// Result of [`AppointmentBoard::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows replaced; number of rows now held
    Applied(usize),
    /// A newer load already landed; this response was dropped
    Stale,
}

/// A mutation the server accepted
#[derive(Debug)]
pub enum MutationOutcome {
    /// Change applied and the list reloaded
    Applied(AppointmentRecord),
    /// Change applied but the reload failed; rows still show the previous state
    AppliedButStale {
        record: AppointmentRecord,
        reload_error: AppError,
    },
}

impl MutationOutcome {
    /// Record as returned by the server
    #[must_use]
    pub fn record(&self) -> &AppointmentRecord {
        match self {
            Self::Applied(record) | Self::AppliedButStale { record, .. } => record,
        }
    }

    /// Why the list could not be refreshed, if it could not
    #[must_use]
    pub fn reload_error(&self) -> Option<&AppError> {
        match self {
            Self::Applied(_) => None,
            Self::AppliedButStale { reload_error, .. } => Some(reload_error),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::AppliedButStale { .. })
    }
}

#[derive(Debug, Default)]
struct BoardState {
    rows: Vec<AppointmentRow>,
    /// Generation of the load that produced `rows`
    applied: u64,
    filter: AppointmentFilter,
    last_error: Option<String>,
}

/// Removes the row id from the in-flight set when dropped
struct InFlight<'a> {
    set: &'a DashSet<AppointmentId>,
    id: AppointmentId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a DashSet<AppointmentId>, id: &AppointmentId) -> AppResult<Self> {
        if set.insert(id.clone()) {
            Ok(Self { set, id: id.clone() })
        } else {
            Err(AppError::Busy(id.clone()))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

/// Appointment list of the signed-in user
pub struct AppointmentBoard {
    ctx: Arc<AppContext>,
    state: Mutex<BoardState>,
    in_flight: DashSet<AppointmentId>,
    generation: AtomicU64,
}

impl AppointmentBoard {
    #[must_use]
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(BoardState::default()),
            in_flight: DashSet::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Fetch `GET /api/appointments/my` and replace the rows
    pub async fn load(&self) -> AppResult<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "loading appointments");

        let fetched = self
            .ctx
            .call(|api, token| async move { api.my_appointments(&token).await })
            .await;

        let mut state = self.state.lock();
        if generation < state.applied {
            warn!(generation, applied = state.applied, "dropping stale appointment list");
            return Ok(LoadOutcome::Stale);
        }
        match fetched {
            Ok(records) => {
                state.rows = project_appointments(&records, &self.ctx.tz());
                state.applied = generation;
                state.last_error = None;
                debug!(generation, rows = state.rows.len(), "appointments applied");
                Ok(LoadOutcome::Applied(state.rows.len()))
            }
            Err(e) => {
                state.last_error = Some(e.user_message(LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// All rows, backend order
    #[must_use]
    pub fn rows(&self) -> Vec<AppointmentRow> {
        self.state.lock().rows.clone()
    }

    /// Row by id
    #[must_use]
    pub fn row(&self, id: &AppointmentId) -> Option<AppointmentRow> {
        self.state.lock().rows.iter().find(|r| r.id == *id).cloned()
    }

    /// Message of the last failed load, cleared by the next successful one
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn set_filter(&self, filter: AppointmentFilter) {
        self.state.lock().filter = filter;
    }

    #[must_use]
    pub fn filter(&self) -> AppointmentFilter {
        self.state.lock().filter.clone()
    }

    /// Rows passing the current filter, with date buckets relative to `now`
    #[must_use]
    pub fn filtered<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<AppointmentRow> {
        let state = self.state.lock();
        state
            .filter
            .apply(&state.rows, now)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether a mutation for `id` is running; its controls should be disabled
    #[must_use]
    pub fn is_in_flight(&self, id: &AppointmentId) -> bool {
        self.in_flight.contains(id)
    }

    /// Doctor confirms a pending appointment
    pub async fn confirm(&self, id: &AppointmentId) -> AppResult<MutationOutcome> {
        let row = self.known_row(id)?;
        validate_transition(&row.status, &AppointmentStatus::Confirmed)?;
        let target = id.clone();
        self.mutate(id, "confirm", move |api, token| async move {
            api.confirm_appointment(&token, &target).await
        })
        .await
    }

    /// Doctor rejects a pending appointment; `reason` must not be blank
    pub async fn reject(&self, id: &AppointmentId, reason: &str) -> AppResult<MutationOutcome> {
        let request = RejectRequest::new(id.clone(), reason)?;
        let row = self.known_row(id)?;
        if !row.awaits_decision() {
            return Err(illegal(&row, AppointmentStatus::Cancelled));
        }
        self.mutate(id, "reject", move |api, token| async move {
            api.reject_appointment(&token, &request.appointment_id, &request.reason)
                .await
        })
        .await
    }

    /// Patient cancels their own pending appointment
    pub async fn cancel(&self, id: &AppointmentId) -> AppResult<MutationOutcome> {
        let row = self.known_row(id)?;
        if !row.can_cancel() {
            return Err(illegal(&row, AppointmentStatus::Cancelled));
        }
        let target = id.clone();
        self.mutate(id, "cancel", move |api, token| async move {
            api.cancel_appointment(&token, &target).await
        })
        .await
    }

    /// Doctor moves an appointment to `status`, optionally recording a result
    pub async fn set_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
        result: Option<String>,
    ) -> AppResult<MutationOutcome> {
        let row = self.known_row(id)?;
        validate_transition(&row.status, &status)?;
        let update = StatusUpdate {
            status: Some(status),
            result: result.filter(|r| !r.trim().is_empty()),
        };
        let target = id.clone();
        self.mutate(id, "update", move |api, token| async move {
            api.update_appointment(&token, &target, &update).await
        })
        .await
    }

    /// Public lookup by appointment code; does not touch the list
    pub async fn lookup_code(&self, code: &str) -> AppResult<AppointmentRow> {
        let code = hms_core::error::require("appointment code", code)?;
        let record = self.ctx.api().appointment_by_code(code).await?;
        Ok(project_appointment(&record, &self.ctx.tz()))
    }

    fn known_row(&self, id: &AppointmentId) -> AppResult<AppointmentRow> {
        self.row(id)
            .ok_or_else(|| AppError::UnknownAppointment(id.clone()))
    }

    async fn mutate<F, Fut>(
        &self,
        id: &AppointmentId,
        action: &'static str,
        op: F,
    ) -> AppResult<MutationOutcome>
    where
        F: FnOnce(Arc<dyn hms_client::HospitalApi>, hms_core::AuthToken) -> Fut,
        Fut: Future<Output = Result<AppointmentRecord, ApiError>>,
    {
        let _guard = InFlight::acquire(&self.in_flight, id)?;
        let record = match self.ctx.call(op).await {
            Ok(record) => record,
            Err(e) => {
                warn!(%id, action, error = %e, "appointment mutation failed");
                return Err(e);
            }
        };
        info!(%id, action, status = %record.status, "appointment updated");

        match self.load().await {
            Ok(_) => Ok(MutationOutcome::Applied(record)),
            Err(reload_error) => {
                warn!(%id, action, error = %reload_error, "reload after mutation failed");
                Ok(MutationOutcome::AppliedButStale {
                    record,
                    reload_error,
                })
            }
        }
    }
}

fn illegal(row: &AppointmentRow, to: AppointmentStatus) -> AppError {
    TransitionError::Illegal {
        from: row.status.clone(),
        to,
    }
    .into()
}

impl std::fmt::Debug for AppointmentBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AppointmentBoard")
            .field("rows", &state.rows.len())
            .field("applied", &state.applied)
            .field("filter", &state.filter)
            .finish_non_exhaustive()
    }
}
