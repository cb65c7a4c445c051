//! Fitted normal curve scaled to raw histogram counts.

#![allow(clippy::cast_precision_loss)]

use crate::error::{Error, Result};
use crate::histogram::Histogram;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Default number of points sampled along the curve.
pub const DEFAULT_SAMPLES: usize = 100;

/// A point on the overlay curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    /// Count value.
    pub x: f64,
    /// Expected number of strands per bin at `x`.
    pub expected_strands: f64,
}

/// Normal distribution fitted to a count vector.
///
/// Values are `pdf(x) * strands * bin_width` so they are directly
/// comparable with the bin populations of the matching [`Histogram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalOverlay {
    /// Sample mean of the counts.
    pub mean: f64,
    /// Population standard deviation of the counts.
    pub std_dev: f64,
    /// Factor converting density into strands per bin.
    pub scale: f64,
    /// Curve sampled across the histogram range.
    pub points: Vec<OverlayPoint>,
}

impl NormalOverlay {
    /// Fits a normal curve to `counts` and samples it at `samples` evenly
    /// spaced points across the histogram range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCounts`] for an empty vector and
    /// [`Error::DegenerateSpread`] when all counts are equal.
    pub fn fit(counts: &[u64], histogram: &Histogram, samples: usize) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::EmptyCounts);
        }

        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let mean = values.iter().mean();
        let std_dev = values.iter().population_std_dev();

        let normal = Normal::new(mean, std_dev).map_err(|_| Error::DegenerateSpread)?;

        let scale = counts.len() as f64 * histogram.bin_width();
        let (lo, hi) = histogram.range();
        let step = if samples > 1 {
            (hi - lo) / (samples - 1) as f64
        } else {
            0.0
        };

        let points = (0..samples)
            .map(|i| {
                let x = lo + step * i as f64;
                OverlayPoint {
                    x,
                    expected_strands: normal.pdf(x) * scale,
                }
            })
            .collect();

        Ok(Self {
            mean,
            std_dev,
            scale,
            points,
        })
    }

    /// Expected strands per bin at `x`.
    ///
    /// Returns 0 when the stored parameters do not describe a normal
    /// distribution.
    #[must_use]
    pub fn expected_at(&self, x: f64) -> f64 {
        Normal::new(self.mean, self.std_dev).map_or(0.0, |normal| normal.pdf(x) * self.scale)
    }
}
