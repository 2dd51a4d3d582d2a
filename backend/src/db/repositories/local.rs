//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. The catalog is held in
//! plain vectors in insertion order, which plays the role of the database's
//! default row order.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::db::dataset::{Dataset, GeneRecord};
use crate::db::repository::*;
use crate::models::*;

/// In-memory local repository.
///
/// # Example
/// ```
/// use tfbs_browser::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// let motif = repo.add_motif("SOX2");
/// assert_eq!(motif.name, "SOX2");
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    genes: Vec<Gene>,
    synonyms: Vec<GeneSynonym>,
    motifs: Vec<Motif>,
    binding_sites: Vec<Tfbs>,
    users: HashMap<String, User>,

    next_motif_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            genes: Vec::new(),
            synonyms: Vec::new(),
            motifs: Vec::new(),
            binding_sites: Vec::new(),
            users: HashMap::new(),
            next_motif_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository holding a validated dataset.
    pub fn from_dataset(dataset: Dataset) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.load_dataset(dataset)?;
        Ok(repo)
    }

    /// Create a repository from a JSON dataset file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        Self::from_dataset(Dataset::from_file(path)?)
    }

    /// Replace the repository contents with `dataset`.
    pub fn load_dataset(&self, dataset: Dataset) -> RepositoryResult<()> {
        dataset.validate()?;

        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };

        for GeneRecord { gene, synonyms } in dataset.genes {
            data.synonyms
                .extend(synonyms.into_iter().map(|name| GeneSynonym {
                    entrez_id: gene.entrez_id,
                    name,
                }));
            data.genes.push(gene);
        }
        data.next_motif_id = dataset.motifs.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        data.motifs = dataset.motifs;
        data.binding_sites = dataset.binding_sites;
        data.users = dataset
            .users
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Ok(())
    }

    /// Add a gene and its synonyms.
    pub fn add_gene(&self, gene: Gene, synonyms: &[&str]) {
        let mut data = self.data.write();
        data.synonyms.extend(synonyms.iter().map(|name| GeneSynonym {
            entrez_id: gene.entrez_id,
            name: name.to_string(),
        }));
        data.genes.push(gene);
    }

    /// Add a motif; the id is assigned automatically.
    pub fn add_motif(&self, name: &str) -> Motif {
        let mut data = self.data.write();
        let motif = Motif {
            id: data.next_motif_id,
            name: name.to_string(),
        };
        data.next_motif_id += 1;
        data.motifs.push(motif.clone());
        motif
    }

    pub fn add_binding_site(&self, site: Tfbs) {
        self.data.write().binding_sites.push(site);
    }

    /// Add an account with a freshly hashed password.
    pub fn add_user(&self, username: &str, password: &str, is_active: bool, permissions: &[&str]) {
        let user = User {
            username: username.to_string(),
            password_hash: hash_password(password),
            is_active,
            permissions: permissions.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
        };
        self.data.write().users.insert(user.username.clone(), user);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn motif_ids_named(data: &LocalData, name: &str) -> HashSet<i64> {
        data.motifs
            .iter()
            .filter(|m| m.name == name)
            .map(|m| m.id)
            .collect()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

// ==================== Gene Repository ====================

#[async_trait]
impl GeneRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn count_genes(&self) -> RepositoryResult<i64> {
        self.check_health()?;
        Ok(self.data.read().genes.len() as i64)
    }

    async fn find_genes_by_entrez_id(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<Gene>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .genes
            .iter()
            .filter(|g| g.entrez_id == entrez_id)
            .cloned()
            .collect())
    }

    async fn find_genes_by_synonym(&self, synonym: &str) -> RepositoryResult<Vec<Gene>> {
        self.check_health()?;
        let data = self.data.read();
        let ids: HashSet<EntrezId> = data
            .synonyms
            .iter()
            .filter(|s| s.name == synonym)
            .map(|s| s.entrez_id)
            .collect();
        Ok(data
            .genes
            .iter()
            .filter(|g| ids.contains(&g.entrez_id))
            .cloned()
            .collect())
    }

    async fn find_gene_by_name(&self, name: &str) -> RepositoryResult<Option<Gene>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data.genes.iter().find(|g| g.name == name).cloned())
    }

    async fn fetch_synonyms(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<String>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .synonyms
            .iter()
            .filter(|s| s.entrez_id == entrez_id)
            .map(|s| s.name.clone())
            .collect())
    }

    async fn fetch_gene_binding_sites(
        &self,
        entrez_id: EntrezId,
    ) -> RepositoryResult<Vec<GeneBindingSite>> {
        self.check_health()?;
        let data = self.data.read();
        let motif_names: HashMap<i64, &str> =
            data.motifs.iter().map(|m| (m.id, m.name.as_str())).collect();

        Ok(data
            .binding_sites
            .iter()
            .filter(|t| t.entrez_id == entrez_id)
            .filter_map(|t| {
                motif_names.get(&t.motif_id).map(|name| GeneBindingSite {
                    motif_name: name.to_string(),
                    strand: t.strand,
                    start: t.start,
                    stop: t.stop,
                    p_value: t.p_value,
                    match_sequence: t.match_sequence.clone(),
                })
            })
            .collect())
    }

    async fn complete_entrez_ids(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .genes
            .iter()
            .filter(|g| g.entrez_id.to_string().starts_with(prefix))
            .map(|g| g.name.clone())
            .collect())
    }

    async fn complete_synonyms(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .synonyms
            .iter()
            .filter(|s| starts_with_ignore_case(&s.name, prefix))
            .map(|s| s.name.clone())
            .collect())
    }
}

// ==================== Motif Repository ====================

#[async_trait]
impl MotifRepository for LocalRepository {
    async fn count_motifs(&self) -> RepositoryResult<i64> {
        self.check_health()?;
        Ok(self.data.read().motifs.len() as i64)
    }

    async fn count_binding_sites(&self) -> RepositoryResult<i64> {
        self.check_health()?;
        Ok(self.data.read().binding_sites.len() as i64)
    }

    async fn find_motif_by_name(&self, name: &str) -> RepositoryResult<Option<Motif>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data.motifs.iter().find(|m| m.name == name).cloned())
    }

    async fn fetch_binding_site_rows(
        &self,
        motif_name: &str,
    ) -> RepositoryResult<Vec<BindingSiteRow>> {
        self.check_health()?;
        let data = self.data.read();
        let motif_ids = Self::motif_ids_named(&data, motif_name);
        let genes: HashMap<EntrezId, &Gene> =
            data.genes.iter().map(|g| (g.entrez_id, g)).collect();

        let mut rows: Vec<BindingSiteRow> = Vec::new();
        let mut index: HashMap<(EntrezId, i64, i64), usize> = HashMap::new();

        for site in data
            .binding_sites
            .iter()
            .filter(|t| motif_ids.contains(&t.motif_id))
        {
            let Some(gene) = genes.get(&site.entrez_id) else {
                continue;
            };
            let key = (gene.entrez_id, site.start, site.stop);
            match index.get(&key).copied() {
                Some(idx) => rows[idx].num_sites += 1,
                None => {
                    index.insert(key, rows.len());
                    rows.push(BindingSiteRow {
                        gene_name: gene.name.clone(),
                        chromosome: gene.chromosome.clone(),
                        strand: gene.strand,
                        tss: gene.tss,
                        start_promoter: gene.start_promoter,
                        stop_promoter: gene.stop_promoter,
                        start: site.start,
                        stop: site.stop,
                        num_sites: 1,
                    });
                }
            }
        }

        Ok(rows)
    }

    async fn fetch_motif_genes(&self, motif_name: &str) -> RepositoryResult<Vec<MotifGeneRow>> {
        self.check_health()?;
        let data = self.data.read();
        let motif_ids = Self::motif_ids_named(&data, motif_name);
        let genes: HashMap<EntrezId, &Gene> =
            data.genes.iter().map(|g| (g.entrez_id, g)).collect();

        let mut rows: Vec<MotifGeneRow> = Vec::new();
        let mut index: HashMap<EntrezId, usize> = HashMap::new();

        for site in data
            .binding_sites
            .iter()
            .filter(|t| motif_ids.contains(&t.motif_id))
        {
            let Some(gene) = genes.get(&site.entrez_id) else {
                continue;
            };
            match index.get(&gene.entrez_id).copied() {
                Some(idx) => rows[idx].num_sites += 1,
                None => {
                    index.insert(gene.entrez_id, rows.len());
                    rows.push(MotifGeneRow {
                        entrez_id: gene.entrez_id,
                        gene_name: gene.name.clone(),
                        chromosome: gene.chromosome.clone(),
                        strand: gene.strand,
                        tss: gene.tss,
                        start_promoter: gene.start_promoter,
                        stop_promoter: gene.stop_promoter,
                        num_sites: 1,
                    });
                }
            }
        }

        Ok(rows)
    }

    async fn complete_motif_names(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        self.check_health()?;
        let data = self.data.read();
        let with_sites: HashSet<i64> = data.binding_sites.iter().map(|t| t.motif_id).collect();

        let names: BTreeSet<String> = data
            .motifs
            .iter()
            .filter(|m| with_sites.contains(&m.id) && starts_with_ignore_case(&m.name, prefix))
            .map(|m| m.name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }
}

// ==================== User Repository ====================

#[async_trait]
impl UserRepository for LocalRepository {
    async fn find_user(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.check_health()?;
        Ok(self.data.read().users.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: i64, strand: Strand) -> Gene {
        Gene {
            entrez_id: EntrezId::new(id),
            name: id.to_string(),
            chromosome: "chr1".to_string(),
            strand,
            tss: 10_000,
            start_promoter: 8_000,
            stop_promoter: 10_500,
        }
    }

    fn site(id: i64, motif_id: i64, start: i64, stop: i64) -> Tfbs {
        Tfbs {
            entrez_id: EntrezId::new(id),
            motif_id,
            start,
            stop,
            strand: Strand::Plus,
            p_value: 0.001,
            match_sequence: "ACGTACGT".to_string(),
        }
    }

    #[tokio::test]
    async fn test_binding_site_rows_group_duplicates() {
        let repo = LocalRepository::new();
        repo.add_gene(gene(1, Strand::Plus), &[]);
        let sox2 = repo.add_motif("SOX2");
        repo.add_binding_site(site(1, sox2.id, 100, 300));
        repo.add_binding_site(site(1, sox2.id, 100, 300));
        repo.add_binding_site(site(1, sox2.id, 500, 520));

        let rows = repo.fetch_binding_site_rows("SOX2").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].num_sites, 2);
        assert_eq!(rows[1].num_sites, 1);
        assert_eq!(rows[1].start, 500);
    }

    #[tokio::test]
    async fn test_motif_genes_count_sites_per_gene() {
        let repo = LocalRepository::new();
        repo.add_gene(gene(1, Strand::Plus), &[]);
        repo.add_gene(gene(2, Strand::Minus), &[]);
        let sox2 = repo.add_motif("SOX2");
        repo.add_binding_site(site(2, sox2.id, 1, 20));
        repo.add_binding_site(site(1, sox2.id, 1, 20));
        repo.add_binding_site(site(2, sox2.id, 40, 60));

        let rows = repo.fetch_motif_genes("SOX2").await.unwrap();
        let summary: Vec<(i64, i64)> = rows
            .iter()
            .map(|r| (r.entrez_id.value(), r.num_sites))
            .collect();
        assert_eq!(summary, vec![(2, 2), (1, 1)]);
    }

    #[tokio::test]
    async fn test_motif_completion_only_lists_motifs_with_sites() {
        let repo = LocalRepository::new();
        repo.add_gene(gene(1, Strand::Plus), &[]);
        let sox2 = repo.add_motif("SOX2");
        repo.add_motif("SOX9");
        repo.add_binding_site(site(1, sox2.id, 1, 20));

        assert_eq!(
            repo.complete_motif_names("so").await.unwrap(),
            vec!["SOX2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_queries() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.count_genes().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_clear_keeps_health_flag() {
        let repo = LocalRepository::new();
        repo.add_motif("SOX2");
        repo.set_healthy(false);
        repo.clear();
        repo.set_healthy(true);
        assert_eq!(repo.count_motifs().await.unwrap(), 0);
    }
}
