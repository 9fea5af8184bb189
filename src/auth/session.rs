//! Bearer session tracking for authenticated senders.
//!
//! Sessions are UUIDv4 tokens with an absolute expiry, held in memory.
//! They exist so the service-management endpoints can tie a request to an
//! account; they are deliberately not persisted.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// An issued session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token (UUID v4).
    pub token: String,
    /// Account this session authenticates.
    pub account: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn new(account: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            account: account.to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or_default(),
        }
    }

    /// Whether the session has passed its absolute expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory session manager.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionManager {
    /// Create a manager issuing sessions with the given lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a new session for an account.
    pub fn create(&self, account: &str) -> Session {
        let session = Session::new(account, self.ttl);
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(session.token.clone(), session.clone());
        debug!(account = %account, "session issued");
        session
    }

    /// Resolve a token to its account name, dropping the session if it has
    /// expired.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let expired = {
            let sessions = self.sessions.read().expect("session lock poisoned");
            match sessions.get(token) {
                Some(session) if !session.is_expired() => {
                    return Some(session.account.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.sessions
                .write()
                .expect("session lock poisoned")
                .remove(token);
        }
        None
    }

    /// Revoke a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(token)
            .is_some()
    }

    /// Drop expired sessions. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.read().expect("session lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let manager = SessionManager::default();
        let session = manager.create("alice");

        assert!(!session.token.is_empty());
        assert_eq!(manager.resolve(&session.token), Some("alice".to_string()));
        assert_eq!(manager.resolve("bogus"), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let manager = SessionManager::default();
        let first = manager.create("alice");
        let second = manager.create("alice");
        assert_ne!(first.token, second.token);
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_revoke() {
        let manager = SessionManager::default();
        let session = manager.create("alice");

        assert!(manager.revoke(&session.token));
        assert!(!manager.revoke(&session.token));
        assert_eq!(manager.resolve(&session.token), None);
    }

    #[test]
    fn test_expired_session_is_dropped_on_resolve() {
        let manager = SessionManager::new(Duration::ZERO);
        let session = manager.create("alice");

        assert_eq!(manager.resolve(&session.token), None);
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_cleanup() {
        let manager = SessionManager::new(Duration::ZERO);
        manager.create("alice");
        manager.create("bob");

        assert_eq!(manager.cleanup(), 2);
        assert_eq!(manager.count(), 0);
    }
}
