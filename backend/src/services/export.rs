//! Tab-separated downloads of binding-site data.

use csv::{QuoteStyle, Writer, WriterBuilder};
use thiserror::Error;

use crate::db::repository::{GeneRepository, MotifRepository, RepositoryError};
use crate::models::{GeneBindingSite, MotifGeneRow};

pub const MOTIF_GENES_HEADER: [&str; 7] = [
    "Entrez Id",
    "Synonyms",
    "Chromosome",
    "Strand",
    "Location",
    "TSS",
    "# sites",
];

pub const GENE_SITES_HEADER: [&str; 5] = ["Motif", "Strand", "Location", "p-value", "Match Sequence"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to write TSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("TSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

fn tsv_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> ExportResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render genes bound by a motif. `synonyms` pairs each row with the
/// synonyms of its gene.
pub fn write_motif_genes(rows: &[(MotifGeneRow, Vec<String>)]) -> ExportResult<String> {
    let mut writer = tsv_writer();
    writer.write_record(MOTIF_GENES_HEADER)?;
    for (row, synonyms) in rows {
        writer.write_record([
            row.gene_name.clone(),
            synonyms.join(","),
            row.chromosome.clone(),
            row.strand.to_string(),
            format!("{}-{}", row.start_promoter, row.stop_promoter),
            row.tss.to_string(),
            row.num_sites.to_string(),
        ])?;
    }
    finish(writer)
}

/// Render the binding sites of one gene.
pub fn write_gene_sites(sites: &[GeneBindingSite]) -> ExportResult<String> {
    let mut writer = tsv_writer();
    writer.write_record(GENE_SITES_HEADER)?;
    for site in sites {
        writer.write_record([
            site.motif_name.clone(),
            site.strand.to_string(),
            format!("{}-{}", site.start, site.stop),
            format!("{:.6}", site.p_value),
            site.match_sequence.clone(),
        ])?;
    }
    finish(writer)
}

/// TSV of the distinct genes bound by `tfname`. An unknown motif yields the
/// header row only.
pub async fn motif_genes_tsv<R>(repo: &R, tfname: &str) -> ExportResult<String>
where
    R: GeneRepository + MotifRepository + ?Sized,
{
    let genes = repo.fetch_motif_genes(tfname).await?;
    let mut rows = Vec::with_capacity(genes.len());
    for gene in genes {
        let synonyms = repo.fetch_synonyms(gene.entrez_id).await?;
        rows.push((gene, synonyms));
    }
    write_motif_genes(&rows)
}

/// TSV of the binding sites of the gene named `genename`, or `None` when
/// no gene has that name.
pub async fn gene_sites_tsv<R>(repo: &R, genename: &str) -> ExportResult<Option<String>>
where
    R: GeneRepository + ?Sized,
{
    let Some(gene) = repo.find_gene_by_name(genename).await? else {
        return Ok(None);
    };
    let sites = repo.fetch_gene_binding_sites(gene.entrez_id).await?;
    write_gene_sites(&sites).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntrezId, Strand};

    #[test]
    fn test_empty_motif_export_is_header_only() {
        let tsv = write_motif_genes(&[]).unwrap();
        assert_eq!(
            tsv,
            "Entrez Id\tSynonyms\tChromosome\tStrand\tLocation\tTSS\t# sites\n"
        );
    }

    #[test]
    fn test_motif_gene_row_format() {
        let row = MotifGeneRow {
            entrez_id: EntrezId(6657),
            gene_name: "6657".to_string(),
            chromosome: "chr3".to_string(),
            strand: Strand::Plus,
            tss: 181711925,
            start_promoter: 181709925,
            stop_promoter: 181712425,
            num_sites: 2,
        };
        let tsv = write_motif_genes(&[(row, vec!["SOX2".into(), "ANOP3".into()])]).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "6657\tSOX2,ANOP3\tchr3\t+\t181709925-181712425\t181711925\t2"
        );
    }

    #[test]
    fn test_gene_site_row_format() {
        let site = GeneBindingSite {
            motif_name: "POU5F1".to_string(),
            strand: Strand::Minus,
            start: 100,
            stop: 116,
            p_value: 0.0001,
            match_sequence: "ATTTGCAT".to_string(),
        };
        let tsv = write_gene_sites(&[site]).unwrap();
        assert_eq!(
            tsv,
            "Motif\tStrand\tLocation\tp-value\tMatch Sequence\nPOU5F1\t-\t100-116\t0.000100\tATTTGCAT\n"
        );
    }
}
