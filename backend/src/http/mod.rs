//! HTTP server module.
//!
//! An axum application serving the browser pages, the autocomplete
//! endpoints and the TSV downloads on top of the service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Basic-auth gate middleware                             │
//! │  - HTML views, JSON and TSV responses                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod router;
pub mod state;
pub mod views;

pub use gate::{AccessGate, CurrentUser};
pub use router::create_router;
pub use state::AppState;
