//! Motif repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{BindingSiteRow, Motif, MotifGeneRow};

/// Read-only queries over motifs and the binding sites joined to their genes.
#[async_trait]
pub trait MotifRepository: Send + Sync {
    async fn count_motifs(&self) -> RepositoryResult<i64>;

    async fn count_binding_sites(&self) -> RepositoryResult<i64>;

    /// Motif with exactly this name.
    ///
    /// # Returns
    /// * `Ok(None)` - If no motif matches
    async fn find_motif_by_name(&self, name: &str) -> RepositoryResult<Option<Motif>>;

    /// Binding sites of the named motif joined with their gene's promoter
    /// fields, grouped by gene fields and site coordinates.
    async fn fetch_binding_site_rows(&self, motif_name: &str)
        -> RepositoryResult<Vec<BindingSiteRow>>;

    /// Distinct genes bound by the named motif with their site counts.
    async fn fetch_motif_genes(&self, motif_name: &str) -> RepositoryResult<Vec<MotifGeneRow>>;

    /// Distinct names of motifs that have binding sites and start with
    /// `prefix`, compared case-insensitively.
    async fn complete_motif_names(&self, prefix: &str) -> RepositoryResult<Vec<String>>;
}
