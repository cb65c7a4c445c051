//! Summary statistics over count vectors.

#![allow(clippy::cast_precision_loss)] // counts stay far below 2^53 in practice

use serde::{Deserialize, Serialize};

/// Returns the number of strands whose count is exactly zero.
pub fn count_zero_strands(counts: &[u64]) -> usize {
    counts.iter().filter(|&&c| c == 0).count()
}

/// Theoretical per-strand standard deviation of one multinomial draw of
/// `draws` items over `strands` equally likely strands.
pub fn multinomial_std(draws: u64, strands: usize) -> f64 {
    if strands == 0 {
        return 0.0;
    }
    let p = 1.0 / strands as f64;
    (draws as f64 * p * (1.0 - p)).sqrt()
}

/// Shape of a final count vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountSummary {
    /// Number of strands.
    pub strands: usize,
    /// Sum of all counts.
    pub total: u64,
    /// Mean count per strand.
    pub mean: f64,
    /// Population standard deviation of the counts.
    pub std_dev: f64,
    /// Smallest count.
    pub min: u64,
    /// Largest count.
    pub max: u64,
    /// Strands with a count of exactly zero.
    pub zero_strands: usize,
    /// Fraction of strands with a count of zero.
    pub zero_fraction: f64,
    /// Sample skewness (zero for a symmetric distribution).
    pub skewness: f64,
    /// Excess kurtosis (zero for a normal distribution).
    pub excess_kurtosis: f64,
}

impl CountSummary {
    /// Summarizes a count vector. An empty vector yields the default summary.
    #[must_use]
    pub fn from_counts(counts: &[u64]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }

        let strands = counts.len();
        let n = strands as f64;
        let total: u64 = counts.iter().sum();
        let mean = total as f64 / n;

        let (m2, m3, m4) = counts.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &c| {
            let d = c as f64 - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });
        let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);

        let std_dev = m2.sqrt();
        let (skewness, excess_kurtosis) = if m2 > 0.0 {
            (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
        } else {
            (0.0, 0.0)
        };

        let zero_strands = count_zero_strands(counts);

        Self {
            strands,
            total,
            mean,
            std_dev,
            min: counts.iter().copied().min().unwrap_or(0),
            max: counts.iter().copied().max().unwrap_or(0),
            zero_strands,
            zero_fraction: zero_strands as f64 / n,
            skewness,
            excess_kurtosis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_zero_strands() {
        assert_eq!(count_zero_strands(&[0, 0, 3, 5, 0]), 3);
        assert_eq!(count_zero_strands(&[1, 2, 3]), 0);
        assert_eq!(count_zero_strands(&[]), 0);
    }

    #[test]
    fn summary_of_simple_vector() {
        let summary = CountSummary::from_counts(&[0, 0, 3, 5, 0]);
        assert_eq!(summary.strands, 5);
        assert_eq!(summary.total, 8);
        assert_eq!(summary.min, 0);
        assert_eq!(summary.max, 5);
        assert_eq!(summary.zero_strands, 3);
        assert!((summary.mean - 1.6).abs() < 1e-12);
        assert!((summary.zero_fraction - 0.6).abs() < 1e-12);
        // population variance: (3 * 1.6^2 + 1.4^2 + 3.4^2) / 5 = 4.24
        assert!((summary.std_dev - 4.24_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_vector_has_no_spread() {
        let summary = CountSummary::from_counts(&[4, 4, 4]);
        assert!(summary.std_dev.abs() < f64::EPSILON);
        assert!(summary.skewness.abs() < f64::EPSILON);
        assert!(summary.excess_kurtosis.abs() < f64::EPSILON);
    }

    #[test]
    fn symmetric_vector_has_zero_skew() {
        let summary = CountSummary::from_counts(&[1, 2, 3, 4, 5]);
        assert!(summary.skewness.abs() < 1e-12);
        assert!(summary.excess_kurtosis < 0.0);
    }

    #[test]
    fn empty_vector_yields_default() {
        assert_eq!(CountSummary::from_counts(&[]), CountSummary::default());
    }

    #[test]
    fn multinomial_std_matches_formula() {
        let expected = (1000.0_f64 * 0.1 * 0.9).sqrt();
        assert!((multinomial_std(1000, 10) - expected).abs() < 1e-12);
        assert!(multinomial_std(1000, 0).abs() < f64::EPSILON);
    }
}
