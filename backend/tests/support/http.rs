//! Router helpers for the HTTP integration tests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tower::ServiceExt;

use tfbs_browser::db::repository::FullRepository;
use tfbs_browser::http::{create_router, AppState};

use super::seeded_repository;

pub fn seeded_state() -> AppState {
    AppState::new(Arc::new(seeded_repository()) as Arc<dyn FullRepository>)
}

pub fn seeded_app() -> Router {
    create_router(seeded_state())
}

pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn get_with_header(uri: &str, name: header::HeaderName, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .expect("valid request")
}

/// Send one request through the router and collect the full response.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body = String::from_utf8(bytes.to_vec()).expect("body is UTF-8");
    (status, headers, body)
}
