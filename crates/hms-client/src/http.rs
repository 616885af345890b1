//! `reqwest` implementation of [`HospitalApi`]

use crate::api::HospitalApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use hms_core::{
    AppointmentId, AppointmentRecord, AuthResponse, AuthToken, BookingRequest, ConfirmRequest,
    DoctorCredentials, DoctorProfileFields, DoctorRecord, DoctorRegistration, PatientCredentials,
    PatientRecord, PatientRegistration, RejectRequest, StatusUpdate,
};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// HTTP client for the hospital backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    /// Build a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base = config.base()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;
        Ok(Self { client, base })
    }

    /// Backend origin this client talks to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for path segments below the base; segments are percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("base url cannot carry a path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "request");
        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status.as_u16(), parse_detail(&body));
            warn!(status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(method, segments, token)?.json(body);
        self.send(request).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else if err.is_builder() {
        ApiError::Config(err.to_string())
    } else {
        ApiError::Unreachable(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract the `detail` message from an error body
///
/// Accepts a plain string or a list of validation items with `msg` fields.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let text = match parsed.detail? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::Null => return None,
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl HospitalApi for HttpApi {
    #[instrument(skip_all)]
    async fn login_doctor(&self, credentials: &DoctorCredentials) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, &["api", "auth", "login", "doctor"], None, credentials)
            .await
    }

    #[instrument(skip_all)]
    async fn login_patient(&self, credentials: &PatientCredentials) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, &["api", "auth", "login", "patient"], None, credentials)
            .await
    }

    #[instrument(skip_all)]
    async fn register_doctor(&self, form: &DoctorRegistration) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, &["api", "auth", "register", "doctor"], None, form)
            .await
    }

    #[instrument(skip_all)]
    async fn register_patient(&self, form: &PatientRegistration) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, &["api", "auth", "register", "patient"], None, form)
            .await
    }

    #[instrument(skip_all)]
    async fn logout(&self, token: &AuthToken) -> Result<(), ApiError> {
        let request = self.request(Method::POST, &["api", "auth", "logout"], Some(token))?;
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn my_patient_profile(&self, token: &AuthToken) -> Result<PatientRecord, ApiError> {
        let request = self.request(Method::GET, &["api", "auth", "me", "patient"], Some(token))?;
        self.send(request).await
    }

    #[instrument(skip_all)]
    async fn my_appointments(&self, token: &AuthToken) -> Result<Vec<AppointmentRecord>, ApiError> {
        let request = self.request(Method::GET, &["api", "appointments", "my"], Some(token))?;
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn appointment_by_code(&self, code: &str) -> Result<AppointmentRecord, ApiError> {
        let request = self.request(Method::GET, &["api", "appointments", "code", code], None)?;
        self.send(request).await
    }

    #[instrument(skip_all, fields(doctor_id = %request.doctor_id))]
    async fn book_appointment(
        &self,
        token: &AuthToken,
        request: &BookingRequest,
    ) -> Result<AppointmentRecord, ApiError> {
        // Trailing slash: the collection route is registered as `/api/appointments/`
        self.send_json(Method::POST, &["api", "appointments", ""], Some(token), request)
            .await
    }

    #[instrument(skip(self, token, update), fields(id = %id))]
    async fn update_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        update: &StatusUpdate,
    ) -> Result<AppointmentRecord, ApiError> {
        self.send_json(Method::PUT, &["api", "appointments", id.as_str()], Some(token), update)
            .await
    }

    #[instrument(skip(self, token), fields(id = %id))]
    async fn confirm_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError> {
        let body = ConfirmRequest {
            appointment_id: id.clone(),
        };
        self.send_json(Method::POST, &["api", "appointments", "confirm"], Some(token), &body)
            .await
    }

    #[instrument(skip(self, token, reason), fields(id = %id))]
    async fn reject_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        reason: &str,
    ) -> Result<AppointmentRecord, ApiError> {
        let body = RejectRequest::new(id.clone(), reason)?;
        self.send_json(Method::POST, &["api", "appointments", "reject"], Some(token), &body)
            .await
    }

    #[instrument(skip(self, token), fields(id = %id))]
    async fn cancel_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError> {
        let request = self.request(Method::DELETE, &["api", "appointments", id.as_str()], Some(token))?;
        self.send(request).await
    }

    #[instrument(skip_all)]
    async fn doctors(&self, token: &AuthToken) -> Result<Vec<DoctorRecord>, ApiError> {
        let request = self.request(Method::GET, &["api", "doctors"], Some(token))?;
        self.send(request).await
    }

    #[instrument(skip_all)]
    async fn my_doctor_profile(&self, token: &AuthToken) -> Result<DoctorRecord, ApiError> {
        let request = self.request(Method::GET, &["api", "doctors", "me"], Some(token))?;
        self.send(request).await
    }

    #[instrument(skip_all)]
    async fn update_doctor_profile(
        &self,
        token: &AuthToken,
        fields: &DoctorProfileFields,
    ) -> Result<DoctorRecord, ApiError> {
        self.send_json(Method::PUT, &["api", "doctors", "me"], Some(token), fields)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(&ClientConfig::new().with_base_url(base)).unwrap()
    }

    #[test]
    fn endpoints_join_below_base() {
        let api = api("http://localhost:8000");
        assert_eq!(
            api.endpoint(&["api", "appointments", "my"]).unwrap().as_str(),
            "http://localhost:8000/api/appointments/my"
        );
        assert_eq!(
            api.endpoint(&["api", "appointments", ""]).unwrap().as_str(),
            "http://localhost:8000/api/appointments/"
        );
    }

    #[test]
    fn endpoints_keep_base_prefix() {
        let api = api("https://clinic.example/hms/");
        assert_eq!(
            api.endpoint(&["api", "doctors"]).unwrap().as_str(),
            "https://clinic.example/hms/api/doctors"
        );
    }

    #[test]
    fn appointment_codes_are_escaped() {
        let api = api("http://localhost:8000");
        let url = api.endpoint(&["api", "appointments", "code", "A/1?x"]).unwrap();
        assert_eq!(url.path(), "/api/appointments/code/A%2F1%3Fx");
    }

    #[test]
    fn detail_as_string() {
        assert_eq!(
            parse_detail(r#"{"detail":"Incorrect email or password"}"#).as_deref(),
            Some("Incorrect email or password")
        );
    }

    #[test]
    fn detail_as_validation_list() {
        let body = r#"{"detail":[{"loc":["body","problem"],"msg":"field required"},
                                  {"loc":["body","doctor_id"],"msg":"value is not a valid integer"}]}"#;
        assert_eq!(
            parse_detail(body).as_deref(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn missing_or_garbled_detail() {
        assert_eq!(parse_detail(""), None);
        assert_eq!(parse_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(parse_detail(r#"{"message":"nope"}"#), None);
        assert_eq!(parse_detail(r#"{"detail":null}"#), None);
        assert_eq!(parse_detail(r#"{"detail":"  "}"#), None);
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_unreachable() {
        // Port 9 (discard) on loopback is closed on test machines
        let api = HttpApi::new(
            &ClientConfig::new()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout_secs(2),
        )
        .unwrap();
        let err = api.appointment_by_code("ABC123").await.unwrap_err();
        assert!(err.is_unreachable(), "unexpected error: {err:?}");
    }
}
