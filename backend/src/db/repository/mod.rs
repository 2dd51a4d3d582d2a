//! Repository trait definitions for the genomics catalog.
//!
//! The catalog is read-only from the web application's point of view, so the
//! traits only expose queries. Responsibilities are split across focused
//! traits:
//!
//! - [`error`]: Error types for repository operations
//! - [`genes`]: Gene, synonym and per-gene binding-site queries
//! - [`motifs`]: Motif lookups and the joined TFBS queries behind the TF page
//!   and the exports
//! - [`users`]: Account lookup for the Basic-auth gate
//!
//! # Convenience Trait Bound
//!
//! Handlers take the composite [`FullRepository`]:
//!
//! ```ignore
//! async fn page<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let counts = repo.count_genes().await?;
//!     let motif = repo.find_motif_by_name("SOX2").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod genes;
pub mod motifs;
pub mod users;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use genes::GeneRepository;
pub use motifs::MotifRepository;
pub use users::UserRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing all three traits.
pub trait FullRepository: GeneRepository + MotifRepository + UserRepository {}

impl<T> FullRepository for T where T: GeneRepository + MotifRepository + UserRepository {}
