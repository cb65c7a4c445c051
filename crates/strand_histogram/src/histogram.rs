//! Equal-width binning of count vectors.

#![allow(clippy::cast_precision_loss)] // counts stay far below 2^53
#![allow(clippy::cast_possible_truncation)] // bin indices are clamped below `bins`
#![allow(clippy::cast_sign_loss)] // bin offsets are non-negative

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default bin count for a single run.
pub const DEFAULT_BINS: usize = 50;

/// One histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge; exclusive except for the last bin.
    pub end: f64,
    /// Number of strands whose count falls in the bin.
    pub strands: u64,
}

/// Histogram of how many strands reached each count range.
///
/// Bins span `[min, max]` of the counts with equal width, the last bin being
/// closed on the right. When every count is equal the range is widened to
/// `[value - 0.5, value + 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct Histogram {
    edges: Vec<f64>,
    strands: Vec<u64>,
    total: usize,
}

#[derive(Deserialize)]
struct RawHistogram {
    edges: Vec<f64>,
    strands: Vec<u64>,
    total: usize,
}

impl TryFrom<RawHistogram> for Histogram {
    type Error = Error;

    fn try_from(raw: RawHistogram) -> Result<Self> {
        if raw.strands.is_empty() {
            return Err(Error::Malformed("no bins".to_string()));
        }
        if raw.edges.len() != raw.strands.len() + 1 {
            return Err(Error::Malformed(format!(
                "{} edges for {} bins",
                raw.edges.len(),
                raw.strands.len()
            )));
        }
        if raw.edges.iter().any(|e| !e.is_finite()) || raw.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Malformed("edges must be finite and increasing".to_string()));
        }
        let binned: u64 = raw.strands.iter().sum();
        if binned != raw.total as u64 {
            return Err(Error::Malformed(format!(
                "bins hold {binned} strands, total says {}",
                raw.total
            )));
        }
        Ok(Self {
            edges: raw.edges,
            strands: raw.strands,
            total: raw.total,
        })
    }
}

impl Histogram {
    /// Bins a count vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCounts`] for an empty vector and
    /// [`Error::InvalidBins`] when `bins` is zero.
    pub fn from_counts(counts: &[u64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidBins(bins));
        }
        let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
            return Err(Error::EmptyCounts);
        };

        let (lo, hi) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut strands = vec![0u64; bins];
        for &c in counts {
            let x = c as f64;
            let mut idx = (((x - lo) / width).floor().max(0.0) as usize).min(bins - 1);
            if x < edges[idx] && idx > 0 {
                idx -= 1;
            } else if idx + 1 < bins && x >= edges[idx + 1] {
                idx += 1;
            }
            strands[idx] += 1;
        }

        debug!(
            "binned {} strands into {} bins over [{}, {}]",
            counts.len(),
            bins,
            lo,
            hi
        );

        Ok(Self {
            edges,
            strands,
            total: counts.len(),
        })
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.strands.len()
    }

    /// Bin edges, `bins() + 1` values.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Strands per bin.
    #[must_use]
    pub fn strands(&self) -> &[u64] {
        &self.strands
    }

    /// Number of strands binned.
    #[must_use]
    pub const fn total_strands(&self) -> usize {
        self.total
    }

    /// Width shared by all bins.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Lowest and highest edge.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// Largest bin population.
    #[must_use]
    pub fn peak(&self) -> u64 {
        self.strands.iter().copied().max().unwrap_or(0)
    }

    /// Iterates over bins in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Bin> + '_ {
        self.strands.iter().enumerate().map(|(i, &strands)| Bin {
            start: self.edges[i],
            end: self.edges[i + 1],
            strands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bins_simple_counts() {
        let hist = Histogram::from_counts(&[1, 1, 2, 3, 3, 3], 2).unwrap();
        assert_eq!(hist.edges(), &[1.0, 2.0, 3.0]);
        assert_eq!(hist.strands(), &[2, 4]);
        assert!((hist.bin_width() - 1.0).abs() < f64::EPSILON);
        assert_eq!(hist.total_strands(), 6);
        assert_eq!(hist.peak(), 4);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let hist = Histogram::from_counts(&[0, 10], 5).unwrap();
        assert_eq!(hist.strands(), &[1, 0, 0, 0, 1]);
    }

    #[test]
    fn constant_counts_widen_the_range() {
        let hist = Histogram::from_counts(&[7, 7, 7], 4).unwrap();
        assert_eq!(hist.range(), (6.5, 7.5));
        assert_eq!(hist.strands().iter().sum::<u64>(), 3);
    }

    #[test]
    fn rejects_empty_input_and_zero_bins() {
        assert!(matches!(
            Histogram::from_counts(&[], 10),
            Err(Error::EmptyCounts)
        ));
        assert!(matches!(
            Histogram::from_counts(&[1, 2], 0),
            Err(Error::InvalidBins(0))
        ));
    }

    #[test]
    fn iter_yields_contiguous_bins() {
        let hist = Histogram::from_counts(&[0, 3, 5, 9, 12], 4).unwrap();
        let bins: Vec<Bin> = hist.iter().collect();
        assert_eq!(bins.len(), 4);
        for pair in bins.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn deserialization_checks_the_layout() {
        let hist = Histogram::from_counts(&[1, 1, 2, 3, 3, 3], 2).unwrap();
        let json = serde_json::to_string(&hist).unwrap();
        assert_eq!(serde_json::from_str::<Histogram>(&json).unwrap(), hist);

        for bad in [
            r#"{"edges":[],"strands":[],"total":0}"#,
            r#"{"edges":[1.0],"strands":[2],"total":2}"#,
            r#"{"edges":[2.0,1.0],"strands":[2],"total":2}"#,
            r#"{"edges":[1.0,2.0],"strands":[2],"total":3}"#,
        ] {
            assert!(
                serde_json::from_str::<Histogram>(bad).is_err(),
                "accepted {bad}"
            );
        }
    }

    proptest! {
        #[test]
        fn every_count_lands_in_exactly_one_bin(
            counts in prop::collection::vec(0u64..10_000, 1..500),
            bins in 1usize..120,
        ) {
            let hist = Histogram::from_counts(&counts, bins).unwrap();
            prop_assert_eq!(hist.bins(), bins);
            prop_assert_eq!(hist.strands().iter().sum::<u64>(), counts.len() as u64);
            for bin in hist.iter() {
                prop_assert!(bin.end > bin.start);
            }
        }
    }
}
