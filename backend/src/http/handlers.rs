//! HTTP request handlers.
//!
//! Handlers parse the request, call the service layer and format the
//! response. Lookups that match nothing render an explicit empty state.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};

use super::dto::{CompletionQuery, HealthResponse, SearchQuery};
use super::error::AppError;
use super::gate::CurrentUser;
use super::state::AppState;
use super::views;
use crate::services;

/// Type alias for handler results
pub type HandlerResult<T> = Result<T, AppError>;

pub const TSV_CONTENT_TYPE: &str = "text/tab-separated-values; charset=utf-8";

// =============================================================================
// Health & pages
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

/// GET /
///
/// Behind the Basic-auth gate.
pub async fn index(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> HandlerResult<Html<String>> {
    let counts = services::dataset_counts(state.repository.as_ref()).await?;
    Ok(views::index_page(&counts, &user.username))
}

/// GET /jbrowse
pub async fn jbrowse() -> Html<String> {
    views::jbrowse_page()
}

// =============================================================================
// Gene and TF lookups
// =============================================================================

/// GET /gene/{genename}
pub async fn view_gene(
    State(state): State<AppState>,
    Path(genename): Path<String>,
) -> HandlerResult<Html<String>> {
    render_gene(&state, &genename).await
}

/// GET /search/gene?searchterm=
pub async fn search_gene(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult<Html<String>> {
    render_gene(&state, &query.searchterm).await
}

async fn render_gene(state: &AppState, term: &str) -> HandlerResult<Html<String>> {
    let detail = services::lookup_gene(state.repository.as_ref(), term).await?;
    Ok(views::gene_page(term, detail.as_ref()))
}

/// GET /tf/{tfname}
pub async fn view_tf(
    State(state): State<AppState>,
    Path(tfname): Path<String>,
) -> HandlerResult<Html<String>> {
    render_tf(&state, &tfname).await
}

/// GET /search/tf?searchterm=
pub async fn search_tf(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult<Html<String>> {
    render_tf(&state, &query.searchterm).await
}

async fn render_tf(state: &AppState, tfname: &str) -> HandlerResult<Html<String>> {
    let report = services::lookup_tf(state.repository.as_ref(), tfname).await?;
    Ok(views::tf_page(&report))
}

// =============================================================================
// Autocomplete
// =============================================================================

/// GET /tf_completions?term=
pub async fn tf_completions(
    State(state): State<AppState>,
    Query(query): Query<CompletionQuery>,
) -> HandlerResult<Json<Vec<String>>> {
    let names = services::motif_completions(state.repository.as_ref(), &query.term).await?;
    Ok(Json(names))
}

/// GET /gene_completions?term=
pub async fn gene_completions(
    State(state): State<AppState>,
    Query(query): Query<CompletionQuery>,
) -> HandlerResult<Json<Vec<String>>> {
    let names = services::gene_completions(state.repository.as_ref(), &query.term).await?;
    Ok(Json(names))
}

// =============================================================================
// TSV exports
// =============================================================================

fn tsv_download(filename: &str, body: String) -> Response {
    // Quotes and control characters cannot appear inside the quoted filename.
    let filename: String = filename
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TSV_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// GET /tfgenes_csv/{tfname}
pub async fn tfgenes_csv(
    State(state): State<AppState>,
    Path(tfname): Path<String>,
) -> HandlerResult<Response> {
    let body = services::motif_genes_tsv(state.repository.as_ref(), &tfname).await?;
    Ok(tsv_download(&format!("{}_genes.tsv", tfname), body))
}

/// GET /genetfbs_csv/{genename}
pub async fn genetfbs_csv(
    State(state): State<AppState>,
    Path(genename): Path<String>,
) -> HandlerResult<Response> {
    let body = services::gene_sites_tsv(state.repository.as_ref(), &genename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gene '{}' not found", genename)))?;
    Ok(tsv_download(&format!("{}_tfbs.tsv", genename), body))
}
