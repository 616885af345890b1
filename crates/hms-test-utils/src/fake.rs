//! In-memory hospital backend

use crate::{doctor_user, patient_user};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hms_client::{ApiError, HospitalApi};
use hms_core::{
    AppointmentId, AppointmentRecord, AppointmentStatus, AuthResponse, AuthToken, BookingRequest,
    DoctorCredentials, DoctorProfileFields, DoctorRecord, DoctorRegistration, PatientCredentials,
    PatientRecord, PatientRegistration, PersonRef, Role, StatusUpdate, UserProfile,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use uuid::Uuid;

/// Backend operations, used for call logs and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    LoginDoctor,
    LoginPatient,
    RegisterDoctor,
    RegisterPatient,
    Logout,
    MyPatientProfile,
    MyAppointments,
    AppointmentByCode,
    Book,
    Update,
    Confirm,
    Reject,
    Cancel,
    Doctors,
    MyDoctorProfile,
    UpdateDoctorProfile,
}

#[derive(Default)]
struct FakeState {
    doctors: Vec<(DoctorRecord, String)>,
    patients: Vec<(PatientRecord, String)>,
    appointments: Vec<AppointmentRecord>,
    tokens: HashMap<String, UserProfile>,
    failures: HashMap<Endpoint, ApiError>,
    list_delays: VecDeque<Duration>,
    calls: Vec<Endpoint>,
    next_id: u64,
    now: Option<DateTime<Utc>>,
}

/// Registration secret accepted by [`FakeApi`]
pub const DOCTOR_SECRET: &str = "hospital-admin";

/// In-memory [`HospitalApi`] with failure injection and a call log
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    /// Empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a doctor account
    pub fn add_doctor(&self, record: DoctorRecord, password: &str) {
        self.state.lock().doctors.push((record, password.to_string()));
    }

    /// Register a patient account
    pub fn add_patient(&self, record: PatientRecord, password: &str) {
        self.state.lock().patients.push((record, password.to_string()));
    }

    /// Store an appointment as-is
    pub fn add_appointment(&self, record: AppointmentRecord) {
        self.state.lock().appointments.push(record);
    }

    /// Issue a token for `user` without going through login
    pub fn issue_token(&self, user: UserProfile) -> AuthToken {
        let raw = format!("tok-{}", Uuid::new_v4());
        self.state.lock().tokens.insert(raw.clone(), user);
        AuthToken::new(raw).expect("generated token is non-blank")
    }

    /// Make every call to `endpoint` fail with `error` until cleared
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.state.lock().failures.insert(endpoint, error);
    }

    /// Fail `endpoint` with a server rejection carrying `detail`
    pub fn reject(&self, endpoint: Endpoint, status: u16, detail: &str) {
        self.fail(endpoint, ApiError::from_status(status, Some(detail.to_string())));
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Invalidate every issued token; later authenticated calls answer 401
    pub fn expire_tokens(&self) {
        self.state.lock().tokens.clear();
    }

    /// Delay the next `my_appointments` responses, one entry per call
    pub fn delay_list_responses(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().list_delays.extend(delays);
    }

    /// Pin the timestamp given to booked appointments
    pub fn set_now(&self, now: DateTime<Utc>) {
        self.state.lock().now = Some(now);
    }

    /// Endpoints called so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<Endpoint> {
        self.state.lock().calls.clone()
    }

    /// How many times `endpoint` was called
    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == endpoint).count()
    }

    /// Current stored record for `id`
    #[must_use]
    pub fn appointment(&self, id: &str) -> Option<AppointmentRecord> {
        self.state
            .lock()
            .appointments
            .iter()
            .find(|a| a.id.as_str() == id)
            .cloned()
    }

    /// Change a stored appointment directly, bypassing the API
    pub fn set_status(&self, id: &str, status: AppointmentStatus) {
        let mut state = self.state.lock();
        if let Some(record) = state.appointments.iter_mut().find(|a| a.id.as_str() == id) {
            record.status = status;
        }
    }

    /// Log the call and return the injected failure, if any
    fn enter(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(endpoint);
        match state.failures.get(&endpoint) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn user(&self, token: &AuthToken) -> Result<UserProfile, ApiError> {
        self.state
            .lock()
            .tokens
            .get(token.expose())
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized {
                detail: Some("Could not validate credentials".to_string()),
            })
    }

    fn session_for(&self, user: UserProfile) -> AuthResponse {
        let token = self.issue_token(user.clone());
        AuthResponse {
            access_token: token.expose().to_string(),
            token_type: Some("bearer".to_string()),
            user,
        }
    }

    fn mutate(
        &self,
        id: &AppointmentId,
        change: impl FnOnce(&mut AppointmentRecord) -> Result<(), ApiError>,
    ) -> Result<AppointmentRecord, ApiError> {
        let mut state = self.state.lock();
        let record = state
            .appointments
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| not_found("Appointment not found"))?;
        change(record)?;
        Ok(record.clone())
    }
}

fn not_found(detail: &str) -> ApiError {
    ApiError::from_status(404, Some(detail.to_string()))
}

fn bad_request(detail: &str) -> ApiError {
    ApiError::from_status(400, Some(detail.to_string()))
}

fn require_role(user: &UserProfile, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        Err(ApiError::from_status(403, Some(format!("Only {role}s can do this"))))
    }
}

#[async_trait]
impl HospitalApi for FakeApi {
    async fn login_doctor(&self, credentials: &DoctorCredentials) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::LoginDoctor)?;
        let found = self
            .state
            .lock()
            .doctors
            .iter()
            .find(|(d, pw)| d.email.as_deref() == Some(credentials.email.as_str()) && *pw == credentials.password)
            .map(|(d, _)| doctor_user(d));
        let user = found.ok_or_else(|| ApiError::from_status(401, Some("Incorrect email or password".into())))?;
        Ok(self.session_for(user))
    }

    async fn login_patient(&self, credentials: &PatientCredentials) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::LoginPatient)?;
        let found = self
            .state
            .lock()
            .patients
            .iter()
            .find(|(p, pw)| p.contact == credentials.contact && *pw == credentials.password)
            .map(|(p, _)| patient_user(p));
        let user =
            found.ok_or_else(|| ApiError::from_status(401, Some("Incorrect contact or password".into())))?;
        Ok(self.session_for(user))
    }

    async fn register_doctor(&self, form: &DoctorRegistration) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::RegisterDoctor)?;
        if form.secret_key != DOCTOR_SECRET {
            return Err(ApiError::from_status(403, Some("Invalid secret key".into())));
        }
        let record = {
            let mut state = self.state.lock();
            if state.doctors.iter().any(|(d, _)| d.email.as_deref() == Some(form.email.as_str())) {
                return Err(bad_request("Email already registered"));
            }
            let record = DoctorRecord {
                id: Uuid::new_v4().to_string(),
                name: form.name.clone(),
                email: Some(form.email.clone()),
                qualification: form.qualification.clone(),
                ..DoctorRecord::default()
            };
            state.doctors.push((record.clone(), form.password.clone()));
            record
        };
        Ok(self.session_for(doctor_user(&record)))
    }

    async fn register_patient(&self, form: &PatientRegistration) -> Result<AuthResponse, ApiError> {
        self.enter(Endpoint::RegisterPatient)?;
        let record = {
            let mut state = self.state.lock();
            if state.patients.iter().any(|(p, _)| p.contact == form.contact) {
                return Err(bad_request("Contact already registered"));
            }
            let record = PatientRecord {
                id: Uuid::new_v4().to_string(),
                name: form.name.clone(),
                contact: form.contact.clone(),
                created_at: Some(Utc::now()),
            };
            state.patients.push((record.clone(), form.password.clone()));
            record
        };
        Ok(self.session_for(patient_user(&record)))
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), ApiError> {
        self.enter(Endpoint::Logout)?;
        self.state.lock().tokens.remove(token.expose());
        Ok(())
    }

    async fn my_patient_profile(&self, token: &AuthToken) -> Result<PatientRecord, ApiError> {
        self.enter(Endpoint::MyPatientProfile)?;
        let user = self.user(token)?;
        require_role(&user, Role::Patient)?;
        self.state
            .lock()
            .patients
            .iter()
            .find(|(p, _)| p.id == user.id)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| not_found("Patient not found"))
    }

    async fn my_appointments(&self, token: &AuthToken) -> Result<Vec<AppointmentRecord>, ApiError> {
        self.enter(Endpoint::MyAppointments)?;
        let user = self.user(token)?;
        let (snapshot, delay) = {
            let mut state = self.state.lock();
            let snapshot: Vec<AppointmentRecord> = state
                .appointments
                .iter()
                .filter(|a| match user.role {
                    Role::Doctor => a.doctor_id.as_deref() == Some(user.id.as_str()),
                    Role::Patient => a.patient_key() == Some(user.id.as_str()),
                })
                .cloned()
                .collect();
            (snapshot, state.list_delays.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn appointment_by_code(&self, code: &str) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::AppointmentByCode)?;
        self.state
            .lock()
            .appointments
            .iter()
            .find(|a| a.appointment_code.as_deref() == Some(code))
            .cloned()
            .ok_or_else(|| not_found("Appointment not found"))
    }

    async fn book_appointment(
        &self,
        token: &AuthToken,
        request: &BookingRequest,
    ) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::Book)?;
        let user = self.user(token)?;
        require_role(&user, Role::Patient)?;
        let mut state = self.state.lock();
        let doctor = state
            .doctors
            .iter()
            .find(|(d, _)| d.id == request.doctor_id)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| not_found("Doctor not found"))?;
        state.next_id += 1;
        let code = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        let record = AppointmentRecord {
            id: AppointmentId(format!("{}", state.next_id)),
            appointment_code: Some(format!("APT-{code}")),
            patient_id: Some(user.id.clone()),
            doctor_id: Some(doctor.id.clone()),
            patient: Some(PersonRef {
                id: Some(user.id.clone()),
                name: Some(user.name.clone()),
                contact: user.contact.clone(),
                email: None,
            }),
            doctor: Some(PersonRef {
                id: Some(doctor.id.clone()),
                name: Some(doctor.name.clone()),
                contact: doctor.phone.clone(),
                email: doctor.email.clone(),
            }),
            problem: request.problem.clone(),
            severity: Some(request.severity.as_str().to_string()),
            duration: request.duration.clone(),
            medical_history: request.medical_history.clone(),
            result: None,
            status: AppointmentStatus::Pending,
            cancellation_reason: None,
            created_at: Some(state.now.unwrap_or_else(Utc::now)),
        };
        state.appointments.push(record.clone());
        Ok(record)
    }

    async fn update_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        update: &StatusUpdate,
    ) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::Update)?;
        let user = self.user(token)?;
        require_role(&user, Role::Doctor)?;
        self.mutate(id, |record| {
            if let Some(status) = &update.status {
                record.status = status.clone();
            }
            if let Some(result) = &update.result {
                record.result = Some(result.clone());
            }
            Ok(())
        })
    }

    async fn confirm_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::Confirm)?;
        let user = self.user(token)?;
        require_role(&user, Role::Doctor)?;
        self.mutate(id, |record| {
            if record.status != AppointmentStatus::Pending {
                return Err(bad_request("Only pending appointments can be confirmed"));
            }
            record.status = AppointmentStatus::Confirmed;
            Ok(())
        })
    }

    async fn reject_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
        reason: &str,
    ) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::Reject)?;
        let user = self.user(token)?;
        require_role(&user, Role::Doctor)?;
        self.mutate(id, |record| {
            if record.status != AppointmentStatus::Pending {
                return Err(bad_request("Only pending appointments can be rejected"));
            }
            record.status = AppointmentStatus::Cancelled;
            record.cancellation_reason = Some(reason.to_string());
            Ok(())
        })
    }

    async fn cancel_appointment(
        &self,
        token: &AuthToken,
        id: &AppointmentId,
    ) -> Result<AppointmentRecord, ApiError> {
        self.enter(Endpoint::Cancel)?;
        let user = self.user(token)?;
        self.mutate(id, |record| {
            if user.role == Role::Patient && record.patient_key() != Some(user.id.as_str()) {
                return Err(ApiError::from_status(
                    403,
                    Some("Not authorized to cancel this appointment".into()),
                ));
            }
            record.status = AppointmentStatus::Cancelled;
            Ok(())
        })
    }

    async fn doctors(&self, token: &AuthToken) -> Result<Vec<DoctorRecord>, ApiError> {
        self.enter(Endpoint::Doctors)?;
        self.user(token)?;
        Ok(self.state.lock().doctors.iter().map(|(d, _)| d.clone()).collect())
    }

    async fn my_doctor_profile(&self, token: &AuthToken) -> Result<DoctorRecord, ApiError> {
        self.enter(Endpoint::MyDoctorProfile)?;
        let user = self.user(token)?;
        require_role(&user, Role::Doctor)?;
        self.state
            .lock()
            .doctors
            .iter()
            .find(|(d, _)| d.id == user.id)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| not_found("Doctor not found"))
    }

    async fn update_doctor_profile(
        &self,
        token: &AuthToken,
        fields: &DoctorProfileFields,
    ) -> Result<DoctorRecord, ApiError> {
        self.enter(Endpoint::UpdateDoctorProfile)?;
        let user = self.user(token)?;
        require_role(&user, Role::Doctor)?;
        let mut state = self.state.lock();
        let (record, _) = state
            .doctors
            .iter_mut()
            .find(|(d, _)| d.id == user.id)
            .ok_or_else(|| not_found("Doctor not found"))?;
        let text = |v: &str| (!v.trim().is_empty()).then(|| v.to_string());
        record.name = fields.name.clone();
        record.email = text(&fields.email);
        record.phone = text(&fields.phone);
        record.qualification = text(&fields.qualification);
        record.specialization = text(&fields.specialization);
        record.experience = text(&fields.experience);
        record.department = text(&fields.department);
        record.bio = text(&fields.bio);
        Ok(record.clone())
    }
}
