//! # TFBS browser
//!
//! Web application for browsing genes, transcription-factor motifs and the
//! binding sites (TFBS) linking them.
//!
//! ## Features
//!
//! - **Gene lookup**: by Entrez id or synonym, with synonyms and binding sites
//! - **TF lookup**: histogram of binding-site distances to the promoter
//! - **Autocomplete**: JSON suggestions for motif and gene search boxes
//! - **Exports**: TSV downloads of bound genes and per-gene binding sites
//! - **Access control**: Basic-auth gate backed by server-side sessions
//!
//! ## Architecture
//!
//! - [`models`]: domain types shared by every layer
//! - [`db`]: repository traits, Postgres and in-memory backends, factory
//! - [`services`]: distance computation, completion filtering, TSV export
//! - [`auth`]: Basic credential parsing, password digests, sessions
//! - [`http`]: axum router, gate middleware, handlers and views
//! - [`config`]: server settings from the environment

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
