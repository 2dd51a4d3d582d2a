#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use tfbs_browser::db::repositories::LocalRepository;
use tfbs_browser::models::{EntrezId, Gene, Strand, Tfbs};

#[cfg(feature = "http-server")]
pub mod http;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const CURATOR: &str = "curator";
pub const CURATOR_PASSWORD: &str = "open:sesame";

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

fn gene(id: i64, chromosome: &str, strand: Strand, tss: i64, start: i64, stop: i64) -> Gene {
    Gene {
        entrez_id: EntrezId::new(id),
        name: id.to_string(),
        chromosome: chromosome.to_string(),
        strand,
        tss,
        start_promoter: start,
        stop_promoter: stop,
    }
}

fn site(entrez_id: i64, motif_id: i64, start: i64, stop: i64, p_value: f64, seq: &str) -> Tfbs {
    Tfbs {
        entrez_id: EntrezId::new(entrez_id),
        motif_id,
        start,
        stop,
        strand: Strand::Plus,
        p_value,
        match_sequence: seq.to_string(),
    }
}

/// Small catalog used across the integration tests.
///
/// Distances of the seeded sites:
/// - SOX2: 915 (gene 6657), 1323 (gene 5460), gene 1 is an outlier
/// - POU5F1: 217 (gene 6657)
/// - KLF4 has no binding sites
pub fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();

    repo.add_gene(
        gene(6657, "chr3", Strand::Plus, 181711925, 181709925, 181712425),
        &["SOX2", "ANOP3"],
    );
    repo.add_gene(
        gene(5460, "chr6", Strand::Minus, 31170682, 31170182, 31172682),
        &["POU5F1", "OCT4"],
    );
    repo.add_gene(
        gene(1, "chr19", Strand::Plus, 58864865, 58862865, 58865365),
        &["A1BG", "ENSG00000121410"],
    );

    let sox2 = repo.add_motif("SOX2");
    let pou5f1 = repo.add_motif("POU5F1");
    repo.add_motif("KLF4");

    repo.add_binding_site(site(6657, pou5f1.id, 181711700, 181711716, 0.0001, "ATTTGCATAACAATG"));
    repo.add_binding_site(site(6657, sox2.id, 181711000, 181711020, 0.002, "CCATTGTTC"));
    repo.add_binding_site(site(5460, sox2.id, 31172000, 31172010, 0.01, "ACAATGG"));
    repo.add_binding_site(site(1, sox2.id, 58900000, 58900010, 0.5, "ACAAAGG"));

    repo.add_user(CURATOR, CURATOR_PASSWORD, true, &[]);
    repo.add_user("retired", "password", false, &[]);

    repo
}
