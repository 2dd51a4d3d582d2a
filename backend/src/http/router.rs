//! Router configuration for the web application.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! the Basic-auth gate) and creates the axum router ready for serving.

use axum::{middleware, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::gate::{require_access, AccessGate};
use super::handlers;
use super::state::AppState;
use crate::auth::AccessRule;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Only the index page requires a signed-in user.
    let gate = AccessGate::new(state.clone(), AccessRule::Authenticated);
    let gated = Router::new()
        .route("/", get(handlers::index))
        .route_layer(middleware::from_fn_with_state(gate, require_access));

    Router::new()
        .merge(gated)
        .route("/health", get(handlers::health_check))
        .route("/jbrowse", get(handlers::jbrowse))
        .route("/gene/{genename}", get(handlers::view_gene))
        .route("/search/gene", get(handlers::search_gene))
        .route("/tf/{tfname}", get(handlers::view_tf))
        .route("/search/tf", get(handlers::search_tf))
        .route("/tf_completions", get(handlers::tf_completions))
        .route("/gene_completions", get(handlers::gene_completions))
        .route("/tfgenes_csv/{tfname}", get(handlers::tfgenes_csv))
        .route("/genetfbs_csv/{genename}", get(handlers::genetfbs_csv))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let _router = create_router(AppState::new(repo));
    }
}
