//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

/// `?searchterm=` on the search forms. Missing means empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub searchterm: String,
}

/// `?term=` sent by the autocomplete widgets. Missing means empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionQuery {
    #[serde(default)]
    pub term: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
