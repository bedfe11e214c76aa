//! CSRF token issuing and validation.
//!
//! Tokens are random nonces stored per intention in the caller's session,
//! so a token minted for one form cannot be replayed against another.
//! Comparison is constant-time, and a token is single use: validation
//! consumes the stored token whether or not the submission matched.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use constant_time_eq::constant_time_eq;
use rand::{thread_rng, RngCore};

use crate::config::CSRF_TOKEN_BYTES;
use crate::infra::Session;

/// A token bound to one form intention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken {
    intention: String,
    value: String,
}

impl CsrfToken {
    pub fn intention(&self) -> &str {
        &self.intention
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Issues and validates intention-scoped CSRF tokens against a session.
///
/// Stateless by itself; the tokens live in the session so validation in
/// a later request sees what an earlier render issued.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsrfTokenManager;

impl CsrfTokenManager {
    pub fn new() -> Self {
        Self
    }

    /// Mint a token for an intention, replacing the session's previous
    /// token for that intention.
    pub fn issue(&self, session: &Session, intention: &str) -> CsrfToken {
        let value = generate_token_value();
        session.csrf_replace(intention, value.clone());
        CsrfToken {
            intention: intention.to_string(),
            value,
        }
    }

    /// Validate a submitted value against the session's token for an
    /// intention, consuming the stored token.
    pub fn validate(&self, session: &Session, intention: &str, submitted: &str) -> bool {
        session.csrf_check(intention, |stored| {
            constant_time_eq(stored.as_bytes(), submitted.as_bytes())
        })
    }
}

/// Generate a cryptographically secure token value.
fn generate_token_value() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::SessionStore;

    fn session() -> Session {
        SessionStore::new().resolve(None).0
    }

    #[test]
    fn test_issued_token_validates() {
        let session = session();
        let manager = CsrfTokenManager::new();

        let token = manager.issue(&session, "update-user");
        assert!(manager.validate(&session, "update-user", token.value()));
    }

    #[test]
    fn test_token_is_intention_scoped() {
        let session = session();
        let manager = CsrfTokenManager::new();

        let token = manager.issue(&session, "update-user");
        assert!(!manager.validate(&session, "delete-user", token.value()));
    }

    #[test]
    fn test_token_is_single_use() {
        let session = session();
        let manager = CsrfTokenManager::new();

        let token = manager.issue(&session, "update-user");
        assert!(manager.validate(&session, "update-user", token.value()));
        assert!(!manager.validate(&session, "update-user", token.value()));
    }

    #[test]
    fn test_mismatch_invalidates_stored_token() {
        let session = session();
        let manager = CsrfTokenManager::new();

        let token = manager.issue(&session, "update-user");
        assert!(!manager.validate(&session, "update-user", "forged"));
        // The real token no longer validates either; the form must be
        // re-rendered to get a fresh one.
        assert!(!manager.validate(&session, "update-user", token.value()));
    }

    #[test]
    fn test_validate_without_issue_fails() {
        let session = session();
        let manager = CsrfTokenManager::new();

        assert!(!manager.validate(&session, "update-user", "anything"));
    }

    #[test]
    fn test_reissue_replaces_previous_token() {
        let session = session();
        let manager = CsrfTokenManager::new();

        let first = manager.issue(&session, "update-user");
        let second = manager.issue(&session, "update-user");

        assert_ne!(first.value(), second.value());
        // Only the latest token is live
        assert!(!manager.validate(&session, "update-user", first.value()));
    }
}
