//! Service layer between the HTTP handlers and the repositories.
//!
//! Services take any repository implementation and hold the logic that is
//! independent of storage: distance computation, completion filtering and
//! TSV formatting.

pub mod completions;
pub mod distance;
pub mod export;
pub mod lookup;

pub use completions::{gene_completions, is_noisy_ensembl_prefix, motif_completions};
pub use distance::{build_histogram, compute_relative_positions, relative_position};
pub use export::{gene_sites_tsv, motif_genes_tsv, ExportError, ExportResult};
pub use lookup::{dataset_counts, lookup_gene, lookup_tf, parse_entrez_id};
