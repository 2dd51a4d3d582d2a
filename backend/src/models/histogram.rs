use serde::{Deserialize, Serialize};

/// Number of buckets the TF page draws the distance histogram with.
pub const HISTOGRAM_BUCKETS: usize = 30;

/// Sorted binding-site distances relative to the transcription start site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramData {
    pub minval: i64,
    pub maxval: i64,
    pub refval: i64,
    pub data: Vec<i64>,
    pub num_buckets: usize,
}

impl HistogramData {
    /// Build a histogram from distances that are already sorted ascending.
    pub fn from_sorted(data: Vec<i64>) -> Self {
        Self {
            minval: data.first().copied().unwrap_or(0),
            maxval: data.last().copied().unwrap_or(0),
            refval: 0,
            data,
            num_buckets: HISTOGRAM_BUCKETS,
        }
    }

    pub fn empty() -> Self {
        Self::from_sorted(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for HistogramData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Result of a transcription-factor lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfReport {
    pub tfname: String,
    pub motif: Option<super::Motif>,
    pub histogram: HistogramData,
}
