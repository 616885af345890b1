use chrono::{DateTime, Duration, TimeZone, Utc};
use hms_core::{
    project_appointment, AppointmentFilter, AppointmentRecord, AppointmentRow, AppointmentStatus,
    DateFilter, StatusFilter,
};
use proptest::prelude::*;

fn status_spelling() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pending".to_string()),
        Just("Pending".to_string()),
        Just("PENDING".to_string()),
        Just("confirmed".to_string()),
        Just("completed".to_string()),
        Just("cancelled".to_string()),
        Just("upcoming".to_string()),
    ]
}

fn make_row(index: usize, status: &str, created_at: DateTime<Utc>) -> AppointmentRow {
    let json = format!(
        r#"{{"id":"{index}","problem":"p","status":"{status}","created_at":"{}"}}"#,
        created_at.to_rfc3339()
    );
    let record: AppointmentRecord = serde_json::from_str(&json).unwrap();
    project_appointment(&record, &Utc)
}

fn base_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn pending_filter_returns_exactly_pending_rows(
        statuses in prop::collection::vec(status_spelling(), 0..40)
    ) {
        let now = base_now();
        let rows: Vec<AppointmentRow> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| make_row(i, s, now))
            .collect();

        let filter = AppointmentFilter::new().with_status(StatusFilter::Only(AppointmentStatus::Pending));
        let kept = filter.apply(&rows, &now);

        let expected = statuses.iter().filter(|s| s.as_str() == "pending").count();
        prop_assert_eq!(kept.len(), expected);
        prop_assert!(kept.iter().all(|r| r.status.as_str() == "pending"));
    }

    #[test]
    fn week_bucket_matches_day_offset(minutes_ago in 0i64..(20 * 24 * 60)) {
        let now = base_now();
        let created_at = now - Duration::minutes(minutes_ago);
        let row = make_row(0, "pending", created_at);

        let days_back = (now.date_naive() - created_at.date_naive()).num_days();
        let in_week = AppointmentFilter::new()
            .with_date(DateFilter::ThisWeek)
            .matches(&row, &now);

        prop_assert_eq!(in_week, (0..=6).contains(&days_back));
    }

    #[test]
    fn all_filter_keeps_everything(
        statuses in prop::collection::vec(status_spelling(), 0..20)
    ) {
        let now = base_now();
        let rows: Vec<AppointmentRow> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| make_row(i, s, now - Duration::days(i as i64 * 40)))
            .collect();
        prop_assert_eq!(AppointmentFilter::new().apply(&rows, &now).len(), rows.len());
    }
}
