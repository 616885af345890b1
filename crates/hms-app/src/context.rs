//! Application context
//!
//! The one piece of shared state: the backend handle, the session store, the
//! current location and configuration. View-models hold an `Arc<AppContext>`
//! and issue authenticated requests through [`AppContext::call`].

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::router::{home, landing, resolve, resolve_path, Resolution, Route};
use crate::session::SessionStore;
use crate::storage::{FileStorage, SessionStorage};
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use hms_client::{ApiError, HospitalApi, HttpApi};
use hms_core::{AuthState, AuthToken, Session};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
pub struct AppContext {
    api: Arc<dyn HospitalApi>,
    session: SessionStore,
    location: RwLock<Route>,
    config: AppConfig,
    tz: FixedOffset,
}

impl AppContext {
    /// Context over an explicit backend and storage, displaying times in the local offset
    #[must_use]
    pub fn new(api: Arc<dyn HospitalApi>, storage: Arc<dyn SessionStorage>, config: AppConfig) -> Self {
        Self {
            api,
            session: SessionStore::new(storage),
            location: RwLock::new(Route::Login),
            config,
            tz: Local::now().offset().fix(),
        }
    }

    /// Production wiring: HTTP backend, file storage in `config.data_dir`
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let api = HttpApi::new(&config.client)?;
        let storage = FileStorage::new(&config.data_dir);
        Ok(Self::new(Arc::new(api), Arc::new(storage), config))
    }

    /// Display times at a fixed UTC offset
    #[inline]
    #[must_use]
    pub fn with_offset(mut self, tz: FixedOffset) -> Self {
        self.tz = tz;
        self
    }

    /// Restore the persisted session and land on the matching page
    pub fn restore(&self) -> AuthState {
        let state = self.session.restore();
        *self.location.write() = landing(state);
        state
    }

    /// Backend handle, for unauthenticated calls
    #[inline]
    #[must_use]
    pub fn api(&self) -> &Arc<dyn HospitalApi> {
        &self.api
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Offset used for display and date filters
    #[inline]
    #[must_use]
    pub fn tz(&self) -> FixedOffset {
        self.tz
    }

    /// Current time in the display offset
    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.tz)
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    /// Page currently shown
    #[must_use]
    pub fn location(&self) -> Route {
        *self.location.read()
    }

    /// Navigate, applying role gating
    pub fn navigate(&self, route: Route) -> Resolution {
        let resolution = resolve(self.state(), route);
        *self.location.write() = resolution.route();
        resolution
    }

    /// Navigate to a raw path
    pub fn navigate_path(&self, path: &str) -> Resolution {
        let resolution = resolve_path(self.state(), path);
        *self.location.write() = resolution.route();
        resolution
    }

    /// Current session or [`AppError::NotAuthenticated`]
    pub fn require_session(&self) -> AppResult<Session> {
        self.session.current().ok_or(AppError::NotAuthenticated)
    }

    /// Persist a fresh session and go to the role's home
    pub fn sign_in(&self, session: Session) -> AppResult<Resolution> {
        let role = session.role();
        self.session.login(session)?;
        Ok(self.navigate(home(role)))
    }

    /// Sign out: notify the backend, then clear the local session regardless
    pub async fn logout(&self) -> AppResult<()> {
        if let Some(token) = self.session.token() {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "logout request failed; clearing local session anyway");
            }
        }
        let cleared = self.session.logout();
        *self.location.write() = Route::Login;
        cleared.map_err(AppError::from)
    }

    /// Run an authenticated request
    ///
    /// A 401 answer drops the session and moves to the login page before the
    /// error is returned.
    pub async fn call<T, F, Fut>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(Arc<dyn HospitalApi>, AuthToken) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self.session.token().ok_or(AppError::NotAuthenticated)?;
        match op(Arc::clone(&self.api), token).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_unauthorized() => {
                self.expire_session();
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn expire_session(&self) {
        info!("session rejected by server; signing out");
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "failed to clear stored session");
        }
        *self.location.write() = Route::Login;
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("location", &self.location())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use hms_core::Role;
    use hms_test_utils::{doctor_record, doctor_user, FakeApi};

    fn context(api: Arc<FakeApi>) -> AppContext {
        AppContext::new(api, Arc::new(MemoryStorage::new()), AppConfig::default())
    }

    #[tokio::test]
    async fn call_without_session_is_rejected_locally() {
        let api = Arc::new(FakeApi::new());
        let ctx = context(api.clone());
        let err = ctx
            .call(|api, token| async move { api.doctors(&token).await })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_answer_signs_out() {
        let api = Arc::new(FakeApi::new());
        let alice = doctor_record("d-1", "Alice", "Cardiology");
        let token = api.issue_token(doctor_user(&alice));
        api.add_doctor(alice.clone(), "pw");

        let ctx = context(api.clone());
        ctx.sign_in(Session::new(token, doctor_user(&alice))).unwrap();
        assert_eq!(ctx.location(), Route::DoctorDashboard);

        api.expire_tokens();
        let err = ctx
            .call(|api, token| async move { api.my_doctor_profile(&token).await })
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(ctx.state(), AuthState::Unauthenticated);
        assert_eq!(ctx.location(), Route::Login);
    }

    #[tokio::test]
    async fn logout_clears_even_if_backend_fails() {
        let api = Arc::new(FakeApi::new());
        let alice = doctor_record("d-1", "Alice", "Cardiology");
        let token = api.issue_token(doctor_user(&alice));
        api.fail(hms_test_utils::Endpoint::Logout, ApiError::Unreachable("down".into()));

        let ctx = context(api);
        ctx.sign_in(Session::new(token, doctor_user(&alice))).unwrap();
        ctx.logout().await.unwrap();
        assert_eq!(ctx.state(), AuthState::Unauthenticated);
        assert_eq!(ctx.location(), Route::Login);
    }

    #[test]
    fn navigation_is_gated() {
        let api = Arc::new(FakeApi::new());
        let ctx = context(api.clone());
        assert_eq!(ctx.navigate(Route::Patients), Resolution::Redirect(Route::Login));

        let alice = doctor_record("d-1", "Alice", "Cardiology");
        let token = api.issue_token(doctor_user(&alice));
        ctx.sign_in(Session::new(token, doctor_user(&alice))).unwrap();
        assert_eq!(ctx.state(), AuthState::Authenticated(Role::Doctor));
        assert_eq!(
            ctx.navigate_path("/patient/book"),
            Resolution::Redirect(Route::DoctorDashboard)
        );
        assert_eq!(ctx.navigate(Route::Patients), Resolution::Render(Route::Patients));
    }
}
