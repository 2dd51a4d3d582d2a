//! Authentication primitives behind the Basic-auth gate.
//!
//! - [`basic`]: parsing of `Authorization: Basic ...` headers
//! - [`password`]: salted SHA-256 password digests
//! - [`session`]: in-memory session store keyed by cookie token
//!
//! The gate itself lives in the HTTP layer (`http::gate`); everything here is
//! plain synchronous code that can be tested without a server.

pub mod basic;
pub mod password;
pub mod session;

pub use basic::{parse_basic_credentials, Credentials};
pub use password::{hash_password, verify_password};
pub use session::{SessionStore, SESSION_COOKIE};

use crate::models::User;

/// Reasons a request fails the gate. All of them end in a 401 challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no Authorization header")]
    MissingHeader,
    #[error("Authorization header is not made of a scheme and a token")]
    MalformedHeader,
    #[error("unsupported authorization scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("credentials are not valid base64")]
    InvalidEncoding,
    #[error("credentials are missing the ':' separator")]
    MissingSeparator,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account '{0}' is disabled")]
    InactiveUser(String),
    #[error("account '{0}' lacks the required permission")]
    Forbidden(String),
}

/// Capability a user must have to pass the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    /// Any active, signed-in user.
    Authenticated,
    /// An active user holding this permission label.
    Permission(String),
}

impl AccessRule {
    pub fn permits(&self, user: &User) -> bool {
        match self {
            AccessRule::Authenticated => user.is_active,
            AccessRule::Permission(perm) => user.has_perm(perm),
        }
    }
}
