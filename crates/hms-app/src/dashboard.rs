//! Dashboard view-model

use crate::context::AppContext;
use crate::error::AppResult;
use chrono::{DateTime, TimeZone};
use hms_core::{
    doctor_stats, most_recent, patient_stats, project_appointments, AppointmentRow, Role,
    StatCard,
};

/// Rows shown in the "recent appointments" table
pub const RECENT_LIMIT: usize = 5;

/// Stat cards plus the most recent appointments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub role: Role,
    pub greeting: String,
    pub cards: Vec<StatCard>,
    pub recent: Vec<AppointmentRow>,
}

impl Dashboard {
    /// Build from already projected rows
    #[must_use]
    pub fn from_rows<Tz: TimeZone>(
        role: Role,
        name: &str,
        rows: &[AppointmentRow],
        now: &DateTime<Tz>,
    ) -> Self {
        let cards = match role {
            Role::Doctor => doctor_stats(rows, now),
            Role::Patient => patient_stats(rows),
        };
        let greeting = match role {
            Role::Doctor => format!("Welcome back, Dr. {name}"),
            Role::Patient => format!("Welcome back, {name}"),
        };
        Self {
            role,
            greeting,
            cards,
            recent: most_recent(rows, RECENT_LIMIT),
        }
    }

    /// Load the caller's appointments and summarize them
    pub async fn load<Tz: TimeZone>(ctx: &AppContext, now: &DateTime<Tz>) -> AppResult<Self> {
        let session = ctx.require_session()?;
        let records = ctx
            .call(|api, token| async move { api.my_appointments(&token).await })
            .await?;
        let rows = project_appointments(&records, &ctx.tz());
        Ok(Self::from_rows(session.role(), &session.user.name, &rows, now))
    }

    /// Card value by title
    #[must_use]
    pub fn card(&self, title: &str) -> Option<usize> {
        self.cards.iter().find(|c| c.title == title).map(|c| c.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use hms_core::{project_appointment, AppointmentStatus};
    use hms_test_utils::{appointment, doctor_record, fixed_now, patient_record};

    fn rows() -> Vec<AppointmentRow> {
        let alice = doctor_record("d-1", "Alice", "Cardiology");
        let bob = patient_record("p-1", "Bob", "555-0100");
        let now = fixed_now();
        (0..8)
            .map(|i| {
                let status = if i % 2 == 0 {
                    AppointmentStatus::Pending
                } else {
                    AppointmentStatus::Completed
                };
                let record = appointment(&i.to_string(), &bob, &alice, status, now - Duration::days(i));
                project_appointment(&record, &Utc)
            })
            .collect()
    }

    #[test]
    fn recent_is_capped_and_newest_first() {
        let dash = Dashboard::from_rows(Role::Patient, "Bob", &rows(), &fixed_now());
        assert_eq!(dash.recent.len(), RECENT_LIMIT);
        assert_eq!(dash.recent[0].id.as_str(), "0");
        assert_eq!(dash.recent[4].id.as_str(), "4");
    }

    #[test]
    fn patient_cards() {
        let dash = Dashboard::from_rows(Role::Patient, "Bob", &rows(), &fixed_now());
        assert_eq!(dash.cards.len(), 4);
        assert_eq!(dash.card("Total Appointments"), Some(8));
        assert_eq!(dash.card("Pending"), Some(4));
        assert_eq!(dash.card("Completed"), Some(4));
        assert_eq!(dash.greeting, "Welcome back, Bob");
    }

    #[test]
    fn doctor_cards() {
        let dash = Dashboard::from_rows(Role::Doctor, "Alice", &rows(), &fixed_now());
        assert_eq!(dash.cards.len(), 3);
        assert_eq!(dash.card("Total Patients"), Some(1));
        assert_eq!(dash.card("Today's Appointments"), Some(1));
    }
}
