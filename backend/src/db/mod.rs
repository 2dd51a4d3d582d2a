//! Storage layer for the binding-site catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http/)                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Services (services/) - distances, completions, exports │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │                                  │
//! ┌───▼─────────────────┐   ┌────────────▼──────────┐
//! │  Postgres (diesel)  │   │  Local (in-memory)    │
//! └─────────────────────┘   └───────────────────────┘
//! ```
//!
//! - `repository`: trait definitions and the error type
//! - `repositories::postgres`: Postgres implementation with Diesel
//! - `repositories::local`: in-memory implementation seeded from a [`Dataset`]
//! - `factory`: picks and builds a backend from env or `repository.toml`

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod dataset;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use dataset::{Dataset, GeneRecord};
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, FullRepository, GeneRepository, MotifRepository, RepositoryError,
    RepositoryResult, UserRepository,
};
