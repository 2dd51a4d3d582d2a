//! Gene repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{EntrezId, Gene, GeneBindingSite};

/// Read-only queries over genes and their synonyms.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait GeneRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    async fn count_genes(&self) -> RepositoryResult<i64>;

    /// Genes whose Entrez id equals `entrez_id`.
    async fn find_genes_by_entrez_id(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<Gene>>;

    /// Genes having a synonym exactly equal to `synonym` (case-sensitive).
    async fn find_genes_by_synonym(&self, synonym: &str) -> RepositoryResult<Vec<Gene>>;

    /// Gene whose name is exactly `name`.
    ///
    /// # Returns
    /// * `Ok(None)` - If no gene carries that name
    async fn find_gene_by_name(&self, name: &str) -> RepositoryResult<Option<Gene>>;

    /// Synonym names of a gene, in store order.
    async fn fetch_synonyms(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<String>>;

    /// Every binding site of a gene joined with its motif name, in store order.
    async fn fetch_gene_binding_sites(
        &self,
        entrez_id: EntrezId,
    ) -> RepositoryResult<Vec<GeneBindingSite>>;

    /// Names of genes whose Entrez id, written in decimal, starts with `prefix`.
    async fn complete_entrez_ids(&self, prefix: &str) -> RepositoryResult<Vec<String>>;

    /// Synonym names starting with `prefix`, compared case-insensitively.
    async fn complete_synonyms(&self, prefix: &str) -> RepositoryResult<Vec<String>>;
}
