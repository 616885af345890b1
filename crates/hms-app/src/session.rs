//! Session store
//!
//! Holds the current [`Session`] in memory and mirrors it to a
//! [`SessionStorage`]. Token and user are written and cleared together; a
//! storage holding only one of them restores as signed out.

use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};
use hms_core::{AuthState, AuthToken, Session, UserProfile};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Persisted session with an in-memory copy
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Store over `storage`; starts signed out until [`SessionStore::restore`]
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Load the persisted session
    ///
    /// Authenticated iff both entries are present, the token is non-blank and
    /// the user blob parses. Nothing is checked against the backend.
    pub fn restore(&self) -> AuthState {
        let restored = self.read_persisted();
        let state = match &restored {
            Some(session) => AuthState::Authenticated(session.role()),
            None => AuthState::Unauthenticated,
        };
        debug!(?state, "session restored");
        *self.current.write() = restored;
        state
    }

    fn read_persisted(&self) -> Option<Session> {
        let read = |key| match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "session storage unreadable");
                None
            }
        };
        let token = read(TOKEN_KEY)?;
        let user = read(USER_KEY)?;

        let token = AuthToken::new(token).ok()?;
        match serde_json::from_str::<UserProfile>(&user) {
            Ok(user) => Some(Session::new(token, user)),
            Err(e) => {
                warn!(error = %e, "stored user profile is not valid JSON");
                None
            }
        }
    }

    /// Persist `session` and make it current
    ///
    /// Any previous pair is cleared before the new one is written, and a
    /// failed second write rolls back the first. Storage therefore never pairs
    /// a new user with an old token; a failed login leaves the store signed out.
    pub fn login(&self, session: Session) -> Result<AuthState, StorageError> {
        let user = serde_json::to_string(&session.user).map_err(|e| StorageError::Write {
            key: USER_KEY.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        self.clear_persisted()?;
        *self.current.write() = None;

        self.storage.set(USER_KEY, &user)?;
        if let Err(e) = self.storage.set(TOKEN_KEY, session.token.expose()) {
            if let Err(rollback) = self.storage.remove(USER_KEY) {
                warn!(error = %rollback, "failed to roll back partial session");
            }
            return Err(e);
        }

        let role = session.role();
        info!(user_id = %session.user.id, %role, "signed in");
        *self.current.write() = Some(session);
        Ok(AuthState::Authenticated(role))
    }

    /// Clear memory and storage
    ///
    /// Memory is cleared first, so the store reads as signed out even when
    /// storage removal fails.
    pub fn logout(&self) -> Result<(), StorageError> {
        let previous = self.current.write().take();
        if let Some(session) = previous {
            info!(user_id = %session.user.id, "signed out");
        }
        self.clear_persisted()
    }

    /// Remove both entries, attempting the second even if the first fails
    fn clear_persisted(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// Current session
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    /// Current user
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    /// Current authentication state
    #[must_use]
    pub fn state(&self) -> AuthState {
        match self.current.read().as_ref() {
            Some(session) => AuthState::Authenticated(session.role()),
            None => AuthState::Unauthenticated,
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
