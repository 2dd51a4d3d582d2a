//! In-memory session store.
//!
//! A successful Basic login creates a session; the token travels back to the
//! client in the [`SESSION_COOKIE`] cookie and admits later requests without
//! credentials until it expires.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::User;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Clone)]
struct Session {
    user: User,
    expires_at: DateTime<Utc>,
}

/// Shared, cloneable session store.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Open a session for `user` and return its token.
    pub fn create(&self, user: User) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let session = Session {
            user,
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| s.expires_at > Utc::now());
        sessions.insert(token.clone(), session);
        token
    }

    /// User owning a live session, if any. Expired sessions are dropped.
    pub fn get(&self, token: &str) -> Option<User> {
        {
            let sessions = self.sessions.read();
            match sessions.get(token) {
                Some(s) if s.expires_at > Utc::now() => return Some(s.user.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().remove(token);
        None
    }

    pub fn remove(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Set-Cookie` value for a session token.
    pub fn cookie_header(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl.num_seconds()
        )
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(12))
    }
}

/// Extract the session token from a `Cookie` header value.
pub fn session_token(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            username: "alice".to_string(),
            password_hash: String::new(),
            is_active: true,
            permissions: Default::default(),
        }
    }

    #[test]
    fn test_created_session_resolves_user() {
        let store = SessionStore::default();
        let token = store.create(alice());
        assert_eq!(store.get(&token).map(|u| u.username), Some("alice".to_string()));
        assert!(store.get("unknown").is_none());
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let store = SessionStore::new(Duration::seconds(-1));
        let token = store.create(alice());
        assert!(store.get(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unbounded_ttl_does_not_overflow() {
        let store = SessionStore::new(Duration::MAX);
        let token = store.create(alice());
        assert_eq!(store.get(&token).map(|u| u.username), Some("alice".to_string()));
    }

    #[test]
    fn test_remove_session() {
        let store = SessionStore::default();
        let token = store.create(alice());
        assert!(store.remove(&token));
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        assert_eq!(session_token("a=1; sessionid=abc; b=2"), Some("abc"));
        assert_eq!(session_token("sessionid="), None);
        assert_eq!(session_token("other=1"), None);
    }

    #[test]
    fn test_cookie_header_contains_token() {
        let store = SessionStore::new(Duration::minutes(5));
        let header = store.cookie_header("tok");
        assert!(header.starts_with("sessionid=tok;"));
        assert!(header.contains("Max-Age=300"));
    }
}
