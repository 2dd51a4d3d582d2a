use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An account allowed to sign in to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Salted digest, see [`crate::auth::password`].
    pub password_hash: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn has_perm(&self, perm: &str) -> bool {
        self.is_active && self.permissions.contains(perm)
    }
}
