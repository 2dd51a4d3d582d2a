use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entrez gene identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntrezId(pub i64);

impl EntrezId {
    pub fn new(value: i64) -> Self {
        EntrezId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntrezId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Genomic strand of a gene or binding site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(format!("Invalid strand '{}', expected '+' or '-'", other)),
        }
    }
}

/// A gene with its promoter region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub entrez_id: EntrezId,
    /// Display name. In the loaded data sets this is the textual Entrez id.
    pub name: String,
    pub chromosome: String,
    pub strand: Strand,
    /// Transcription start site
    pub tss: i64,
    pub start_promoter: i64,
    pub stop_promoter: i64,
}

/// Alternate name of a gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneSynonym {
    pub entrez_id: EntrezId,
    pub name: String,
}

/// Everything the gene detail page shows about a single gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneDetail {
    pub gene: Gene,
    pub synonyms: Vec<String>,
    pub binding_sites: Vec<GeneBindingSite>,
}

/// One binding site of a gene, joined with the name of its motif.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneBindingSite {
    pub motif_name: String,
    pub strand: Strand,
    pub start: i64,
    pub stop: i64,
    pub p_value: f64,
    pub match_sequence: String,
}

/// Record counts shown on the landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub genes: i64,
    pub motifs: i64,
    pub binding_sites: i64,
}
