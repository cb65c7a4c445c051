//! Per-cell results and the aggregated sweep report.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use strand_engine::{CountSummary, Mode};
use strand_histogram::{Histogram, NormalOverlay};
use xxhash_rust::xxh64::xxh64;

/// Seed for xxhash so fingerprints are stable across runs.
const FINGERPRINT_SEED: u64 = 0x5354_5241_4E44; // "STRAND" in hex

/// Stable digest of a count vector.
pub fn fingerprint(counts: &[u64]) -> String {
    let bytes: Vec<u8> = counts.iter().flat_map(|c| c.to_le_bytes()).collect();
    format!("{:016x}", xxh64(&bytes, FINGERPRINT_SEED))
}

/// Outcome of one sweep cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellResult {
    /// Position in grid order.
    pub index: usize,
    /// Scaling factor `c`.
    pub scaling_factor: i64,
    /// Draws per round, `c * n`.
    pub draws_per_round: u64,
    /// Round count `R`.
    pub rounds: usize,
    /// Seed the cell ran with.
    pub seed: u64,
    /// Shape of the final counts.
    pub summary: CountSummary,
    /// Binned final counts.
    pub histogram: Histogram,
    /// Fitted normal curve, absent when the counts have no spread.
    pub overlay: Option<NormalOverlay>,
    /// Digest of the final count vector.
    pub fingerprint: String,
}

impl CellResult {
    /// File stem used when exporting this cell.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("c{}_r{}", self.scaling_factor, self.rounds)
    }
}

impl fmt::Display for CellResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:>12} {:>4} {:>12.2} {:>10.2} {:>8} {:>7.3} {:>7.3}  {}",
            self.scaling_factor,
            self.draws_per_round,
            self.rounds,
            self.summary.mean,
            self.summary.std_dev,
            self.summary.zero_strands,
            self.summary.skewness,
            self.summary.excess_kurtosis,
            self.fingerprint
        )
    }
}

/// Results of a whole sweep, in grid order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// When the report was produced (RFC 3339).
    pub generated_at: String,
    /// Resampling mode of every cell.
    pub mode: Mode,
    /// Strands per cell.
    pub strands: usize,
    /// Master seed.
    pub seed: u64,
    /// Cell results.
    pub cells: Vec<CellResult>,
}

impl SweepReport {
    /// Creates a report stamped with the current time.
    #[must_use]
    pub fn new(mode: Mode, strands: usize, seed: u64, cells: Vec<CellResult>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            mode,
            strands,
            seed,
            cells,
        }
    }

    /// Looks up the cell for a `(c, R)` pair.
    #[must_use]
    pub fn cell(&self, scaling_factor: i64, rounds: usize) -> Option<&CellResult> {
        self.cells
            .iter()
            .find(|c| c.scaling_factor == scaling_factor && c.rounds == rounds)
    }

    /// Serializes the report to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes `report.json` plus a histogram CSV and, where a fit exists,
    /// an overlay CSV for every cell. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(1 + self.cells.len() * 2);

        let report_path = dir.join("report.json");
        std::fs::write(&report_path, self.to_json()?)?;
        written.push(report_path);

        for cell in &self.cells {
            let stem = cell.file_stem();
            let hist_path = dir.join(format!("{stem}_histogram.csv"));
            strand_histogram::save_histogram_csv(&cell.histogram, &hist_path)?;
            written.push(hist_path);

            if let Some(overlay) = &cell.overlay {
                let overlay_path = dir.join(format!("{stem}_overlay.csv"));
                strand_histogram::save_overlay_csv(overlay, &overlay_path)?;
                written.push(overlay_path);
            }
        }

        Ok(written)
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sweep Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "Mode:    {}", self.mode)?;
        writeln!(f, "Strands: {}", self.strands)?;
        writeln!(f, "Seed:    {}", self.seed)?;
        writeln!(f, "Cells:   {}", self.cells.len())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>4} {:>12} {:>4} {:>12} {:>10} {:>8} {:>7} {:>7}  fingerprint",
            "c", "M", "R", "mean", "std dev", "zeros", "skew", "kurt"
        )?;

        for cell in &self.cells {
            writeln!(f, "{cell}")?;
        }

        Ok(())
    }
}
