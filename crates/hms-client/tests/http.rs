//! `HttpApi` against a local HTTP server

use hms_client::{ApiError, ClientConfig, HospitalApi, HttpApi};
use hms_core::{AppointmentId, AppointmentStatus, AuthToken, StatusUpdate, ValidationError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-abc";
const BEARER: &str = "Bearer tok-abc";

fn record(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "appointment_code": format!("APT-{id}"),
        "problem": "headache",
        "status": status,
        "created_at": "2025-03-20T09:30:00Z",
    })
}

fn client(server: &MockServer) -> HttpApi {
    HttpApi::new(&ClientConfig::new().with_base_url(server.uri())).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new(TOKEN).unwrap()
}

#[tokio::test]
async fn confirm_posts_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments/confirm"))
        .and(header("authorization", BEARER))
        .and(body_json(json!({"appointment_id": "42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("42", "confirmed")))
        .expect(1)
        .mount(&server)
        .await;

    let confirmed = client(&server)
        .confirm_appointment(&token(), &AppointmentId::from("42"))
        .await
        .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    assert_eq!(confirmed.appointment_code.as_deref(), Some("APT-42"));
}

#[tokio::test]
async fn reject_sends_trimmed_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments/reject"))
        .and(header("authorization", BEARER))
        .and(body_json(json!({"appointment_id": "42", "reason": "doctor unavailable"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("42", "cancelled")))
        .expect(1)
        .mount(&server)
        .await;

    let rejected = client(&server)
        .reject_appointment(&token(), &AppointmentId::from("42"), "  doctor unavailable ")
        .await
        .unwrap();
    assert_eq!(rejected.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn blank_reject_reason_is_refused_locally() {
    let server = MockServer::start().await;
    let err = client(&server)
        .reject_appointment(&token(), &AppointmentId::from("42"), "   ")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Invalid(ValidationError::EmptyRejectionReason));
    assert_eq!(err.detail(), None);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn status_401_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/my"))
        .and(header("authorization", BEARER))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).my_appointments(&token()).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Unauthorized {
            detail: Some("Could not validate credentials".into())
        }
    );
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn validation_list_detail_maps_to_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/42"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "status"], "msg": "value is not a valid enumeration member"}]
        })))
        .mount(&server)
        .await;

    let update = StatusUpdate {
        status: Some(AppointmentStatus::Completed),
        result: None,
    };
    let err = client(&server)
        .update_appointment(&token(), &AppointmentId::from("42"), &update)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 422,
            detail: Some("value is not a valid enumeration member".into())
        }
    );
    assert_eq!(err.user_message("Failed"), "value is not a valid enumeration member");
}

#[tokio::test]
async fn server_error_without_detail_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/appointments/42"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .cancel_appointment(&token(), &AppointmentId::from("42"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected { status: 502, detail: None });
    assert_eq!(err.user_message("Failed to cancel appointment"), "Failed to cancel appointment");
}

#[tokio::test]
async fn malformed_success_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"doctors": "not a list"})))
        .mount(&server)
        .await;

    let err = client(&server).doctors(&token()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn code_lookup_sends_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/code/APT-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("42", "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server).appointment_by_code("APT-42").await.unwrap();
    assert_eq!(found.id, AppointmentId::from("42"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}
