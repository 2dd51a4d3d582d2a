use serde::{Deserialize, Serialize};

use super::gene::{EntrezId, Strand};

/// A transcription-factor motif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motif {
    pub id: i64,
    pub name: String,
}

/// A transcription-factor binding site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tfbs {
    pub entrez_id: EntrezId,
    pub motif_id: i64,
    pub start: i64,
    pub stop: i64,
    pub strand: Strand,
    pub p_value: f64,
    pub match_sequence: String,
}

/// Binding sites of a motif joined with the promoter fields of their gene.
///
/// Rows are grouped by the gene fields plus the site coordinates;
/// `num_sites` counts the binding sites collapsed into the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSiteRow {
    pub gene_name: String,
    pub chromosome: String,
    pub strand: Strand,
    pub tss: i64,
    pub start_promoter: i64,
    pub stop_promoter: i64,
    pub start: i64,
    pub stop: i64,
    pub num_sites: i64,
}

/// One distinct gene bound by a motif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifGeneRow {
    pub entrez_id: EntrezId,
    pub gene_name: String,
    pub chromosome: String,
    pub strand: Strand,
    pub tss: i64,
    pub start_promoter: i64,
    pub stop_promoter: i64,
    pub num_sites: i64,
}
