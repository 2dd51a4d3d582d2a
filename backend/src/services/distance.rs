//! Binding-site positions relative to the transcription start site.
//!
//! Each binding site is reduced to its midpoint and measured against the
//! promoter edge 500 bp inside the promoter region. Sites more than 8 kb
//! away from that reference point are discarded as noise.

use crate::models::{BindingSiteRow, HistogramData, Strand};

/// Offset from the promoter edge used as the reference point.
pub const PROMOTER_OFFSET: i64 = 500;

/// Distances beyond this magnitude are treated as outliers.
pub const MAX_DISTANCE: i64 = 8000;

/// Signed distance of a binding site from the reference point of its gene.
///
/// The midpoint uses truncating integer division, so a site with
/// `stop < start` is mirrored onto the other side of `start`. Returns `None`
/// when the coordinates are too large for the arithmetic.
pub fn relative_position(
    strand: Strand,
    start_promoter: i64,
    stop_promoter: i64,
    start: i64,
    stop: i64,
) -> Option<i64> {
    let middle = stop.checked_sub(start)? / 2;
    let x = if middle > 0 {
        start.checked_add(middle)?
    } else {
        start.checked_sub(middle)?
    };

    match strand {
        Strand::Plus => stop_promoter.checked_sub(PROMOTER_OFFSET)?.checked_sub(x),
        Strand::Minus => x.checked_sub(start_promoter.checked_add(PROMOTER_OFFSET)?),
    }
}

/// Distances for every row within the `[-8000, 8000]` window, in input order.
/// Rows whose distance cannot be computed are dropped like outliers.
pub fn compute_relative_positions(rows: &[BindingSiteRow]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| {
            let dist = relative_position(
                row.strand,
                row.start_promoter,
                row.stop_promoter,
                row.start,
                row.stop,
            );
            match dist {
                Some(dist) if (-MAX_DISTANCE..=MAX_DISTANCE).contains(&dist) => Some(dist),
                Some(dist) => {
                    log::warn!(
                        "Dropping binding site at distance {} for gene {}",
                        dist,
                        row.gene_name
                    );
                    None
                }
                None => {
                    log::warn!(
                        "Dropping binding site {}-{} for gene {}: coordinates out of range",
                        row.start,
                        row.stop,
                        row.gene_name
                    );
                    None
                }
            }
        })
        .collect()
}

/// Sorted distance histogram for a motif's binding-site rows.
pub fn build_histogram(rows: &[BindingSiteRow]) -> HistogramData {
    let mut dists = compute_relative_positions(rows);
    dists.sort_unstable();
    HistogramData::from_sorted(dists)
}
