use hms_app::{AppConfig, AppContext, AppError, AppointmentBoard, MemoryStorage};
use hms_client::MockHospitalApi;
use hms_core::{
    AppointmentId, AppointmentRecord, AppointmentStatus, AuthToken, Session, UserProfile,
    ValidationError,
};
use std::sync::Arc;

fn pending_record(id: &str) -> AppointmentRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "appointment_code": "APT-7",
        "problem": "back pain",
        "severity": "severe",
        "status": "pending",
        "created_at": "2025-03-20T09:30:00Z",
        "patient": {"id": "p-1", "name": "Bob", "contact": "555-0100"},
        "doctor": {"id": "d-1", "name": "Alice"}
    }))
    .unwrap()
}

fn doctor_context(api: MockHospitalApi) -> Arc<AppContext> {
    let ctx = AppContext::new(Arc::new(api), Arc::new(MemoryStorage::new()), AppConfig::default());
    let user: UserProfile = serde_json::from_value(serde_json::json!({
        "id": "d-1", "name": "Alice", "type": "doctor", "email": "alice@clinic.org"
    }))
    .unwrap();
    ctx.sign_in(Session::new(AuthToken::new("tok").unwrap(), user))
        .unwrap();
    Arc::new(ctx)
}

#[tokio::test]
async fn test_blank_reject_reason_makes_no_request() {
    let mut api = MockHospitalApi::new();
    api.expect_my_appointments()
        .times(1)
        .returning(|_| Ok(vec![pending_record("7")]));
    api.expect_reject_appointment().never();

    let board = AppointmentBoard::new(doctor_context(api));
    board.load().await.unwrap();

    for reason in ["", "   ", "\t\n"] {
        let err = board.reject(&AppointmentId::from("7"), reason).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::EmptyRejectionReason)
        ));
    }
    assert_eq!(
        board.row(&AppointmentId::from("7")).unwrap().status,
        AppointmentStatus::Pending
    );
}

#[tokio::test]
async fn test_reject_sends_trimmed_reason_then_reloads() {
    let mut api = MockHospitalApi::new();
    let mut seq = mockall::Sequence::new();

    api.expect_my_appointments()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![pending_record("7")]));
    api.expect_reject_appointment()
        .withf(|_, id, reason| id.as_str() == "7" && reason.trim() == "doctor unavailable")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, reason| {
            let mut record = pending_record("7");
            record.status = AppointmentStatus::Cancelled;
            record.cancellation_reason = Some(reason.to_string());
            Ok(record)
        });
    api.expect_my_appointments()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            let mut record = pending_record("7");
            record.status = AppointmentStatus::Cancelled;
            record.cancellation_reason = Some("doctor unavailable".into());
            Ok(vec![record])
        });

    let board = AppointmentBoard::new(doctor_context(api));
    board.load().await.unwrap();
    board
        .reject(&AppointmentId::from("7"), "  doctor unavailable ")
        .await
        .unwrap();

    let row = board.row(&AppointmentId::from("7")).unwrap();
    assert_eq!(row.status, AppointmentStatus::Cancelled);
    assert_eq!(row.cancellation_reason.as_deref(), Some("doctor unavailable"));
}
