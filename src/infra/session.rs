//! In-process session storage.
//!
//! Sessions are resolved per request from a cookie by the session
//! middleware and passed explicitly into service calls; nothing in the
//! application reads session state ambiently. A session carries the two
//! pieces of per-visitor state this application has: flash messages and
//! per-intention CSRF tokens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{thread_rng, RngCore};

use crate::config::SESSION_ID_BYTES;

/// Mutable per-visitor state, guarded by the session's lock.
#[derive(Debug, Default)]
struct SessionState {
    flash: HashMap<String, String>,
    csrf_tokens: HashMap<String, String>,
}

/// Handle to one visitor's session.
///
/// Cloning is cheap and clones share state, so the handle stored in the
/// request extensions and the one held by the store observe the same
/// flash and CSRF entries.
#[derive(Clone, Debug)]
pub struct Session {
    id: Arc<str>,
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id: id.into(),
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Session identifier as carried by the cookie.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn locked(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a flash message, replacing any pending one under the same key.
    pub fn set_flash(&self, key: &str, value: &str) {
        self.locked().flash.insert(key.to_string(), value.to_string());
    }

    /// Read and clear a flash message as one atomic step.
    ///
    /// A second call for the same key returns `None`, so a stale error
    /// cannot reappear on back-navigation or refresh.
    pub fn take_flash(&self, key: &str) -> Option<String> {
        self.locked().flash.remove(key)
    }

    /// Store a CSRF token for an intention, replacing any previous one.
    pub(crate) fn csrf_replace(&self, intention: &str, value: String) {
        self.locked().csrf_tokens.insert(intention.to_string(), value);
    }

    /// Consume and check the stored token for an intention as one atomic
    /// step.
    ///
    /// Tokens are single use: the stored token is removed by the check,
    /// matching or not. Returns false when no token is stored.
    pub(crate) fn csrf_check(&self, intention: &str, check: impl FnOnce(&str) -> bool) -> bool {
        let stored = self.locked().csrf_tokens.remove(intention);
        match stored {
            Some(stored) => check(&stored),
            None => false,
        }
    }
}

/// Shared registry of live sessions, keyed by session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the session for an incoming request.
    ///
    /// Returns the existing session for a known id, or a fresh one (and
    /// `true`) when the id is absent or unknown, in which case the caller
    /// must send the new id back in a cookie.
    pub fn resolve(&self, id: Option<&str>) -> (Session, bool) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(session) = id.and_then(|id| sessions.get(id)) {
            return (session.clone(), false);
        }

        let session = Session::new(generate_session_id());
        sessions.insert(session.id().to_string(), session.clone());
        (session, true)
    }
}

/// Generate a cryptographically random, URL-safe session identifier.
fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
