//! Dashboard stat cards derived from appointment rows

use crate::appointment::AppointmentRow;
use crate::filter::DateFilter;
use crate::status::AppointmentStatus;
use chrono::{DateTime, TimeZone};
use std::collections::HashSet;

/// One dashboard card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
}

impl StatCard {
    #[inline]
    fn new(title: &'static str, value: usize) -> Self {
        Self { title, value }
    }
}

fn count(rows: &[AppointmentRow], status: &AppointmentStatus) -> usize {
    rows.iter().filter(|r| &r.status == status).count()
}

/// Doctor dashboard: distinct patients, today's appointments, pending appointments.
pub fn doctor_stats<Tz: TimeZone>(rows: &[AppointmentRow], now: &DateTime<Tz>) -> Vec<StatCard> {
    let patients: HashSet<&str> = rows.iter().filter_map(|r| r.patient_id.as_deref()).collect();
    let today = now.date_naive();
    let tz = now.timezone();
    let todays = rows
        .iter()
        .filter(|r| DateFilter::Today.admits(r.local_date(&tz), today))
        .count();

    vec![
        StatCard::new("Total Patients", patients.len()),
        StatCard::new("Today's Appointments", todays),
        StatCard::new("Pending Appointments", count(rows, &AppointmentStatus::Pending)),
    ]
}

/// Patient dashboard: total, upcoming (pending or confirmed), pending, completed.
#[must_use]
pub fn patient_stats(rows: &[AppointmentRow]) -> Vec<StatCard> {
    let pending = count(rows, &AppointmentStatus::Pending);
    let upcoming = pending + count(rows, &AppointmentStatus::Confirmed);

    vec![
        StatCard::new("Total Appointments", rows.len()),
        StatCard::new("Upcoming", upcoming),
        StatCard::new("Pending", pending),
        StatCard::new("Completed", count(rows, &AppointmentStatus::Completed)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::{project_appointment, AppointmentRecord};
    use chrono::Utc;

    fn row(patient: &str, status: &str, created_at: &str) -> AppointmentRow {
        let json = format!(
            r#"{{"id":"x","patient_id":"{patient}","problem":"x","status":"{status}","created_at":"{created_at}"}}"#
        );
        let record: AppointmentRecord = serde_json::from_str(&json).unwrap();
        project_appointment(&record, &Utc)
    }

    #[test]
    fn doctor_has_three_cards() {
        let rows = vec![
            row("p1", "pending", "2025-03-20T09:00:00Z"),
            row("p1", "completed", "2025-03-18T09:00:00Z"),
            row("p2", "pending", "2025-03-20T11:00:00Z"),
        ];
        let now = DateTime::parse_from_rfc3339("2025-03-20T12:00:00Z").unwrap();
        let cards = doctor_stats(&rows, &now);

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].value, 2);
        assert_eq!(cards[1].value, 2);
        assert_eq!(cards[2].value, 2);
    }

    #[test]
    fn patient_has_four_cards() {
        let rows = vec![
            row("p1", "pending", "2025-03-20T09:00:00Z"),
            row("p1", "confirmed", "2025-03-19T09:00:00Z"),
            row("p1", "completed", "2025-03-18T09:00:00Z"),
        ];
        let values: Vec<usize> = patient_stats(&rows).iter().map(|c| c.value).collect();
        assert_eq!(values, vec![3, 2, 1, 1]);
    }
}
