//! Basic-auth gate middleware.
//!
//! A request passes when its `sessionid` cookie names a live session whose
//! user satisfies the route's [`AccessRule`], or when it carries valid Basic
//! credentials. A successful Basic login opens a session and sets the
//! cookie on the response. Everything else gets a 401 challenge.
//!
//! ```ignore
//! let gate = AccessGate::new(state.clone(), AccessRule::Authenticated);
//! let gated = Router::new()
//!     .route("/", get(handlers::index))
//!     .route_layer(middleware::from_fn_with_state(gate, require_access));
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::AppError;
use super::state::AppState;
use crate::auth::session::session_token;
use crate::auth::{parse_basic_credentials, verify_password, AccessRule, AuthError};
use crate::db::repository::RepositoryError;
use crate::models::User;

/// The user admitted by the gate, available to gated handlers as an
/// `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

enum GateFailure {
    Auth(AuthError),
    Repository(RepositoryError),
}

impl From<AuthError> for GateFailure {
    fn from(err: AuthError) -> Self {
        GateFailure::Auth(err)
    }
}

impl From<RepositoryError> for GateFailure {
    fn from(err: RepositoryError) -> Self {
        GateFailure::Repository(err)
    }
}

/// Middleware state: the application plus the rule guarding the route.
#[derive(Clone)]
pub struct AccessGate {
    state: AppState,
    rule: AccessRule,
}

impl AccessGate {
    pub fn new(state: AppState, rule: AccessRule) -> Self {
        Self { state, rule }
    }

    fn session_user(&self, headers: &HeaderMap) -> Option<User> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(session_token)
            .filter_map(|token| self.state.sessions.get(token))
            .find(|user| self.rule.permits(user))
    }

    async fn basic_user(&self, headers: &HeaderMap) -> Result<User, GateFailure> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?;
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let credentials = parse_basic_credentials(value)?;

        let user = self
            .state
            .repository
            .find_user(&credentials.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_active {
            return Err(AuthError::InactiveUser(user.username).into());
        }
        if !self.rule.permits(&user) {
            return Err(AuthError::Forbidden(user.username).into());
        }
        Ok(user)
    }
}

/// 401 response with an empty body and a Basic challenge for `realm`.
pub fn challenge(realm: &str) -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    let value = format!("Basic realm=\"{}\"", realm.replace('"', "'"));
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        Err(_) => {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic"),
            );
        }
    }
    response
}

/// Middleware function enforcing an [`AccessGate`].
pub async fn require_access(
    State(gate): State<AccessGate>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = gate.session_user(request.headers()) {
        request.extensions_mut().insert(CurrentUser(user));
        return next.run(request).await;
    }

    match gate.basic_user(request.headers()).await {
        Ok(user) => {
            let token = gate.state.sessions.create(user.clone());
            tracing::info!(user = %user.username, "opened session from Basic credentials");
            request.extensions_mut().insert(CurrentUser(user));

            let mut response = next.run(request).await;
            if let Ok(cookie) = HeaderValue::from_str(&gate.state.sessions.cookie_header(&token)) {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(GateFailure::Auth(reason)) => {
            tracing::debug!(%reason, "rejected request");
            challenge(&gate.state.realm)
        }
        Err(GateFailure::Repository(err)) => AppError::Repository(err).into_response(),
    }
}
