//! Doctor's patient roster

use crate::context::AppContext;
use crate::error::AppResult;
use hms_core::{build_roster, RosterEntry};

/// Unique patients seen by the signed-in doctor
#[derive(Debug, Clone, Default)]
pub struct PatientRoster {
    entries: Vec<RosterEntry>,
    search: String,
}

impl PatientRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the doctor's appointments
    pub async fn load(&mut self, ctx: &AppContext) -> AppResult<usize> {
        let records = ctx
            .call(|api, token| async move { api.my_appointments(&token).await })
            .await?;
        self.entries = build_roster(&records, &ctx.tz());
        Ok(self.entries.len())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Entries matching the search
    #[must_use]
    pub fn visible(&self) -> Vec<&RosterEntry> {
        self.entries.iter().filter(|e| e.matches(&self.search)).collect()
    }
}
