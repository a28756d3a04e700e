//! Auth service - sign-up, sign-in, sign-out and session restore
//!
//! Owns the in-memory "current user" and the session lifecycle gate the
//! rest of the app waits on. All remote failures are absorbed here: the
//! service moves to Anonymous and reports a structured error, it never
//! panics or leaks a raw response past this boundary.

use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::adapters::rest::ApiClient;
use crate::domain::result::OperationResult;
use crate::domain::{Session, User};
use crate::ports::SessionStore;

/// Where the client stands with respect to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Startup; `restore` has not finished yet
    Initializing,
    Anonymous,
    Authenticated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Initializing => "initializing",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated => "authenticated",
        }
    }
}

#[derive(Debug)]
struct AuthState {
    session_state: SessionState,
    user: Option<User>,
}

/// Auth service over the remote auth endpoints and the session store
pub struct AuthService {
    api: Arc<ApiClient>,
    session_store: Arc<dyn SessionStore>,
    state: Mutex<AuthState>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session_store,
            state: Mutex::new(AuthState {
                session_state: SessionState::Initializing,
                user: None,
            }),
        }
    }

    /// Current state of the session gate
    pub fn session_state(&self) -> SessionState {
        self.state.lock().unwrap().session_state
    }

    /// The verified user, if any
    ///
    /// Invariant: `Some` implies the stored session was validated against
    /// the server at least once since startup.
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_state() == SessionState::Authenticated
    }

    /// The cached session, if one is stored
    pub fn cached_session(&self) -> Option<Session> {
        self.session_store.load().unwrap_or(None)
    }

    /// Restore the session on startup
    ///
    /// Absent session: Anonymous. Present session: validated against
    /// `GET /auth/user`; any failure (network, 4xx/5xx, malformed body)
    /// clears the stored session and lands on Anonymous.
    pub fn restore(&self) -> SessionState {
        let session = match self.session_store.load() {
            Ok(Some(session)) if session.has_access_token() => session,
            Ok(_) => {
                debug!("no stored session, starting anonymous");
                return self.become_anonymous();
            }
            Err(e) => {
                warn!(error = %e, "session load failed, starting anonymous");
                return self.become_anonymous();
            }
        };

        match self.api.get_user(&session.access_token) {
            Ok(user) => {
                info!(user_id = %user.id, "session restored");
                let mut state = self.state.lock().unwrap();
                state.user = Some(user);
                state.session_state = SessionState::Authenticated;
                SessionState::Authenticated
            }
            Err(e) => {
                warn!(error = %e, "stored session rejected, clearing");
                self.become_anonymous()
            }
        }
    }

    /// Register a new account
    ///
    /// Fire-and-forget: does not change the session state; the caller signs
    /// in separately.
    pub fn sign_up(&self, email: &str, password: &str) -> OperationResult<JsonValue> {
        match self.api.sign_up(email, password) {
            Ok(data) => OperationResult::ok(data),
            Err(e) => {
                warn!(error = %e, "signup failed");
                OperationResult::fail(e.to_string())
            }
        }
    }

    /// Exchange credentials for a session
    ///
    /// On success the session is persisted and the user stored. On any
    /// failure the session is cleared, the user is None, and the error is
    /// returned as a message - this method never panics past its boundary.
    pub fn sign_in(&self, email: &str, password: &str) -> OperationResult<User> {
        match self.try_sign_in(email, password) {
            Ok(user) => OperationResult::ok(user),
            Err(message) => {
                self.become_anonymous();
                OperationResult::fail(message)
            }
        }
    }

    fn try_sign_in(&self, email: &str, password: &str) -> std::result::Result<User, String> {
        let (session, user) = self
            .api
            .password_grant(email, password)
            .map_err(|e| e.to_string())?;

        // A session we cannot cache is a failed sign-in
        self.session_store
            .save(&session)
            .map_err(|e| e.to_string())?;

        info!(user_id = %user.id, "signed in");
        let mut state = self.state.lock().unwrap();
        state.user = Some(user.clone());
        state.session_state = SessionState::Authenticated;
        Ok(user)
    }

    /// Sign out
    ///
    /// The remote logout call is best-effort; local state always reaches
    /// Anonymous with no persisted session, even when the call fails.
    pub fn sign_out(&self) -> OperationResult<()> {
        let remote_result = match self.session_store.load() {
            Ok(Some(session)) if session.has_access_token() => {
                self.api.sign_out(&session.access_token)
            }
            _ => Ok(()),
        };

        self.become_anonymous();
        info!("signed out");

        match remote_result {
            Ok(()) => OperationResult::ok(()),
            Err(e) => {
                warn!(error = %e, "remote logout failed, local session cleared anyway");
                OperationResult::fail(e.to_string())
            }
        }
    }

    /// Clear local session and user; always lands on Anonymous
    fn become_anonymous(&self) -> SessionState {
        if let Err(e) = self.session_store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
        let mut state = self.state.lock().unwrap();
        state.user = None;
        state.session_state = SessionState::Anonymous;
        SessionState::Anonymous
    }
}
