//! Gene and transcription-factor lookups behind the detail pages.

use crate::db::repository::{FullRepository, GeneRepository, MotifRepository, RepositoryResult};
use crate::models::{DatasetCounts, EntrezId, GeneDetail, HistogramData, TfReport};

use super::distance::build_histogram;

/// Interpret a search term as an Entrez id, ignoring surrounding whitespace.
pub fn parse_entrez_id(term: &str) -> Option<EntrezId> {
    term.trim().parse::<i64>().ok().map(EntrezId::new)
}

/// Find a gene by Entrez id, or by exact synonym when the term is not
/// numeric, and load its synonyms and binding sites.
///
/// Returns `Ok(None)` when nothing matches.
pub async fn lookup_gene<R>(repo: &R, term: &str) -> RepositoryResult<Option<GeneDetail>>
where
    R: GeneRepository + ?Sized,
{
    let genes = match parse_entrez_id(term) {
        Some(entrez_id) => repo.find_genes_by_entrez_id(entrez_id).await?,
        None => repo.find_genes_by_synonym(term).await?,
    };

    let Some(gene) = genes.into_iter().next() else {
        log::debug!("No gene matches '{}'", term);
        return Ok(None);
    };

    let synonyms = repo.fetch_synonyms(gene.entrez_id).await?;
    let binding_sites = repo.fetch_gene_binding_sites(gene.entrez_id).await?;
    Ok(Some(GeneDetail {
        gene,
        synonyms,
        binding_sites,
    }))
}

/// Distance histogram of a motif's binding sites.
///
/// An unknown motif yields a report without a motif and an empty histogram;
/// the binding-site query is skipped.
pub async fn lookup_tf<R>(repo: &R, tfname: &str) -> RepositoryResult<TfReport>
where
    R: MotifRepository + ?Sized,
{
    let Some(motif) = repo.find_motif_by_name(tfname).await? else {
        log::debug!("No motif named '{}'", tfname);
        return Ok(TfReport {
            tfname: tfname.to_string(),
            motif: None,
            histogram: HistogramData::empty(),
        });
    };

    let rows = repo.fetch_binding_site_rows(&motif.name).await?;
    let histogram = build_histogram(&rows);
    log::debug!(
        "Motif {}: {} binding-site rows, {} kept distances",
        motif.name,
        rows.len(),
        histogram.data.len()
    );

    Ok(TfReport {
        tfname: tfname.to_string(),
        motif: Some(motif),
        histogram,
    })
}

/// Entity counts shown on the index page.
pub async fn dataset_counts<R>(repo: &R) -> RepositoryResult<DatasetCounts>
where
    R: FullRepository + ?Sized,
{
    Ok(DatasetCounts {
        genes: repo.count_genes().await?,
        motifs: repo.count_motifs().await?,
        binding_sites: repo.count_binding_sites().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entrez_id() {
        assert_eq!(parse_entrez_id("6657"), Some(EntrezId(6657)));
        assert_eq!(parse_entrez_id(" 6657 "), Some(EntrezId(6657)));
        assert_eq!(parse_entrez_id("SOX2"), None);
        assert_eq!(parse_entrez_id(""), None);
    }
}
