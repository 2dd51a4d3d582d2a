//! Autocomplete suggestions for the search boxes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::db::repository::{GeneRepository, MotifRepository, RepositoryResult};

use super::lookup::parse_entrez_id;

/// Prefixes of Ensembl gene ids: `e`, `en`, `ens`, `ensg`, or `ensg` followed
/// by digits. Every id in the catalog matches these, so they would return
/// the whole synonym table.
static ENSEMBL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:en?s?g?|ensg\d*)$").expect("Ensembl prefix pattern is valid")
});

/// Terms at most this long that match [`ENSEMBL_PREFIX`] yield no suggestions.
const ENSEMBL_GUARD_MAX_LEN: usize = 10;

/// Whether `term` is a bare Ensembl prefix short enough to be suppressed.
pub fn is_noisy_ensembl_prefix(term: &str) -> bool {
    term.chars().count() <= ENSEMBL_GUARD_MAX_LEN && ENSEMBL_PREFIX.is_match(term)
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Names of motifs with binding sites starting with `term`, ignoring case.
pub async fn motif_completions<R>(repo: &R, term: &str) -> RepositoryResult<Vec<String>>
where
    R: MotifRepository + ?Sized,
{
    let names = dedup_preserving_order(repo.complete_motif_names(term).await?);
    log::debug!("{} motif completions for '{}'", names.len(), term);
    Ok(names)
}

/// Gene suggestions for `term`.
///
/// Numeric terms match Entrez id prefixes and return gene names; surrounding
/// whitespace is ignored as it is for gene lookups. Other terms
/// match synonym prefixes ignoring case, unless they are a bare Ensembl
/// prefix.
pub async fn gene_completions<R>(repo: &R, term: &str) -> RepositoryResult<Vec<String>>
where
    R: GeneRepository + ?Sized,
{
    let numeric = term.trim();
    let names = if parse_entrez_id(numeric).is_some() {
        repo.complete_entrez_ids(numeric).await?
    } else if is_noisy_ensembl_prefix(term) {
        Vec::new()
    } else {
        repo.complete_synonyms(term).await?
    };

    let names = dedup_preserving_order(names);
    log::debug!("{} gene completions for '{}'", names.len(), term);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_matches_bare_prefixes() {
        for term in ["e", "E", "en", "ens", "ENSG", "ensg", "es", "eg", "ENSG00123"] {
            assert!(is_noisy_ensembl_prefix(term), "{term} should be guarded");
        }
    }

    #[test]
    fn test_guard_respects_length_limit() {
        assert!(is_noisy_ensembl_prefix("ENSG000001"));
        assert!(!is_noisy_ensembl_prefix("ENSG001234567"));
    }

    #[test]
    fn test_guard_ignores_other_terms() {
        for term in ["", "SOX2", "ENSGX", "ensgene", "ENST0001", "gensg"] {
            assert!(!is_noisy_ensembl_prefix(term), "{term} should pass");
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_preserving_order(values), vec!["b", "a"]);
    }
}
