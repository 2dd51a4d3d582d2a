mod support;

use tfbs_browser::db::repository::{GeneRepository, MotifRepository};
use tfbs_browser::models::EntrezId;
use tfbs_browser::services::{self, ExportError};

use support::seeded_repository;

#[tokio::test]
async fn test_lookup_gene_by_entrez_id_loads_details() {
    let repo = seeded_repository();
    let detail = services::lookup_gene(&repo, "6657").await.unwrap().unwrap();
    assert_eq!(detail.gene.entrez_id, EntrezId(6657));
    assert_eq!(detail.synonyms, vec!["SOX2", "ANOP3"]);
    let motifs: Vec<&str> = detail
        .binding_sites
        .iter()
        .map(|s| s.motif_name.as_str())
        .collect();
    assert_eq!(motifs, vec!["POU5F1", "SOX2"]);
}

#[tokio::test]
async fn test_lookup_gene_falls_back_to_synonym() {
    let repo = seeded_repository();
    let detail = services::lookup_gene(&repo, "POU5F1").await.unwrap().unwrap();
    assert_eq!(detail.gene.name, "5460");
}

#[tokio::test]
async fn test_lookup_gene_without_match_is_none() {
    let repo = seeded_repository();
    assert!(services::lookup_gene(&repo, "999999").await.unwrap().is_none());
    assert!(services::lookup_gene(&repo, "NOPE").await.unwrap().is_none());
    assert!(services::lookup_gene(&repo, "").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_tf_builds_sorted_histogram() {
    let repo = seeded_repository();
    let report = services::lookup_tf(&repo, "SOX2").await.unwrap();
    assert_eq!(report.motif.as_ref().map(|m| m.name.as_str()), Some("SOX2"));
    assert_eq!(report.histogram.data, vec![915, 1323]);
    assert_eq!(report.histogram.num_buckets, 30);
}

#[tokio::test]
async fn test_lookup_unknown_tf_skips_site_query() {
    let repo = seeded_repository();
    let report = services::lookup_tf(&repo, "NOPE").await.unwrap();
    assert!(report.motif.is_none());
    assert_eq!(report.histogram.minval, 0);
    assert_eq!(report.histogram.maxval, 0);
    assert!(report.histogram.data.is_empty());
}

#[tokio::test]
async fn test_dataset_counts() {
    let repo = seeded_repository();
    let counts = services::dataset_counts(&repo).await.unwrap();
    assert_eq!((counts.genes, counts.motifs, counts.binding_sites), (3, 3, 4));
}

#[tokio::test]
async fn test_gene_completions_dedupe_synonyms() {
    let repo = seeded_repository();
    repo.add_gene(
        tfbs_browser::models::Gene {
            entrez_id: EntrezId(6658),
            name: "6658".to_string(),
            chromosome: "chr3".to_string(),
            strand: tfbs_browser::models::Strand::Plus,
            tss: 0,
            start_promoter: 0,
            stop_promoter: 0,
        },
        &["SOX2"],
    );
    assert_eq!(
        repo.complete_synonyms("SOX").await.unwrap(),
        vec!["SOX2", "SOX2"]
    );
    assert_eq!(
        services::gene_completions(&repo, "SOX").await.unwrap(),
        vec!["SOX2"]
    );
}

#[tokio::test]
async fn test_gene_completions_guard_skips_store() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    // The guard answers without touching the (failing) repository.
    assert!(services::gene_completions(&repo, "ENSG").await.unwrap().is_empty());
    assert!(services::gene_completions(&repo, "SOX").await.is_err());
}

#[tokio::test]
async fn test_motif_genes_tsv_unknown_motif_is_header_only() {
    let repo = seeded_repository();
    let tsv = services::motif_genes_tsv(&repo, "NOPE").await.unwrap();
    assert_eq!(tsv.lines().count(), 1);
}

#[tokio::test]
async fn test_gene_sites_tsv_unknown_gene_is_none() {
    let repo = seeded_repository();
    assert!(services::gene_sites_tsv(&repo, "NOPE").await.unwrap().is_none());
    assert!(services::gene_sites_tsv(&repo, "1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_export_surfaces_repository_errors() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let err = services::motif_genes_tsv(&repo, "SOX2").await.unwrap_err();
    assert!(matches!(err, ExportError::Repository(_)));
}

#[tokio::test]
async fn test_binding_site_rows_match_motif_name_exactly() {
    let repo = seeded_repository();
    assert!(repo.fetch_binding_site_rows("sox2").await.unwrap().is_empty());
    assert_eq!(repo.fetch_binding_site_rows("SOX2").await.unwrap().len(), 3);
}
