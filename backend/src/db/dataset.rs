//! JSON dataset used to seed the in-memory repository.
//!
//! The production catalog is loaded into Postgres by an offline process. For
//! local development and tests the same entities can be described in a single
//! JSON document:
//!
//! ```json
//! {
//!   "genes": [
//!     {"entrez_id": 6657, "name": "6657", "chromosome": "chr3", "strand": "+",
//!      "tss": 181711925, "start_promoter": 181709925, "stop_promoter": 181712425,
//!      "synonyms": ["SOX2", "ANOP3"]}
//!   ],
//!   "motifs": [{"id": 1, "name": "POU5F1"}],
//!   "binding_sites": [
//!     {"entrez_id": 6657, "motif_id": 1, "start": 181711000, "stop": 181711016,
//!      "strand": "-", "p_value": 0.0001, "match_sequence": "ATTTGCATAACAATG"}
//!   ],
//!   "users": [{"username": "curator", "password_hash": "sha256$...$...", "permissions": []}]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Gene, Motif, Tfbs, User};

/// A gene together with its synonyms, as written in the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    #[serde(flatten)]
    pub gene: Gene,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Complete catalog contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub genes: Vec<GeneRecord>,
    #[serde(default)]
    pub motifs: Vec<Motif>,
    #[serde(default)]
    pub binding_sites: Vec<Tfbs>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Dataset {
    /// Parse a dataset from a JSON string and validate it.
    pub fn from_json_str(content: &str) -> RepositoryResult<Self> {
        let dataset: Dataset = serde_json::from_str(content).map_err(|e| {
            RepositoryError::validation_with_context(
                format!("Failed to parse dataset JSON: {}", e),
                ErrorContext::new("load_dataset"),
            )
        })?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Read, parse and validate a dataset file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read dataset file {}: {}",
                path.display(),
                e
            ))
        })?;
        let dataset = Self::from_json_str(&content)?;
        log::info!(
            "Loaded dataset {}: {} genes, {} motifs, {} binding sites",
            path.display(),
            dataset.genes.len(),
            dataset.motifs.len(),
            dataset.binding_sites.len()
        );
        Ok(dataset)
    }

    /// Check the catalog invariants: unique keys, p-values within [0, 1],
    /// and binding sites referencing existing genes and motifs.
    pub fn validate(&self) -> RepositoryResult<()> {
        let mut gene_ids = HashSet::new();
        for record in &self.genes {
            let gene = &record.gene;
            if !gene_ids.insert(gene.entrez_id) {
                return Err(invalid("gene", gene.entrez_id, "duplicate Entrez id"));
            }
            if let Some(bad) = [gene.tss, gene.start_promoter, gene.stop_promoter]
                .into_iter()
                .find(|c| !valid_coordinate(*c))
            {
                return Err(invalid(
                    "gene",
                    gene.entrez_id,
                    format!("coordinate {} outside [0, {}]", bad, MAX_COORDINATE),
                ));
            }
        }

        let mut motif_ids = HashSet::new();
        for motif in &self.motifs {
            if !motif_ids.insert(motif.id) {
                return Err(invalid("motif", motif.id, "duplicate motif id"));
            }
        }

        for (idx, site) in self.binding_sites.iter().enumerate() {
            if let Some(bad) = [site.start, site.stop]
                .into_iter()
                .find(|c| !valid_coordinate(*c))
            {
                return Err(invalid(
                    "tfbs",
                    idx,
                    format!("coordinate {} outside [0, {}]", bad, MAX_COORDINATE),
                ));
            }
            if !(0.0..=1.0).contains(&site.p_value) {
                return Err(invalid(
                    "tfbs",
                    idx,
                    format!("p-value {} outside [0, 1]", site.p_value),
                ));
            }
            if !gene_ids.contains(&site.entrez_id) {
                return Err(invalid(
                    "tfbs",
                    idx,
                    format!("unknown gene {}", site.entrez_id),
                ));
            }
            if !motif_ids.contains(&site.motif_id) {
                return Err(invalid(
                    "tfbs",
                    idx,
                    format!("unknown motif {}", site.motif_id),
                ));
            }
        }

        let mut usernames = HashSet::new();
        for user in &self.users {
            if !usernames.insert(user.username.as_str()) {
                return Err(invalid("user", &user.username, "duplicate username"));
            }
        }

        Ok(())
    }
}

/// Largest accepted chromosome coordinate.
pub const MAX_COORDINATE: i64 = u32::MAX as i64;

fn valid_coordinate(value: i64) -> bool {
    (0..=MAX_COORDINATE).contains(&value)
}

fn invalid(entity: &str, id: impl ToString, details: impl Into<String>) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!("Invalid {} record", entity),
        ErrorContext::new("validate_dataset")
            .with_entity(entity)
            .with_entity_id(id)
            .with_details(details),
    )
}
