//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::{ServerConfig, DEFAULT_REALM};
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Sessions opened by the Basic-auth gate
    pub sessions: SessionStore,
    /// Realm sent in `WWW-Authenticate` challenges
    pub realm: String,
}

impl AppState {
    /// Create a new application state with the given repository and default
    /// session settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            sessions: SessionStore::default(),
            realm: DEFAULT_REALM.to_string(),
        }
    }

    pub fn with_config(repository: Arc<dyn FullRepository>, config: &ServerConfig) -> Self {
        Self {
            repository,
            sessions: SessionStore::new(config.session_ttl()),
            realm: config.realm.clone(),
        }
    }
}
