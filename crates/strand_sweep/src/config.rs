//! Sweep grid configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strand_engine::{EngineConfig, Mode, SimParams};
use xxhash_rust::xxh64::xxh64;

/// Configuration for a scaling-factor × round-count sweep.
///
/// Missing YAML fields fall back to [`SweepConfig::default`], which is the
/// calibration grid: `n = 100_000`, `c ∈ {3, 10, 25, 50}`,
/// `R ∈ {5, 10, 15, 20}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Number of strands shared by every cell.
    pub strands: i64,
    /// Scaling factors `c`, with `M = c * strands`.
    pub scaling_factors: Vec<i64>,
    /// Round counts `R`.
    pub rounds: Vec<i64>,
    /// Resampling mode.
    pub mode: Mode,
    /// Master seed; every cell derives its own seed from it.
    pub seed: u64,
    /// Histogram bins per cell.
    pub bins: usize,
    /// Points sampled along each fitted normal curve.
    pub overlay_samples: usize,
    /// Maximum number of cells running at once.
    pub max_parallel: usize,
    /// Engine settings.
    pub engine: EngineConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            strands: 100_000,
            scaling_factors: vec![3, 10, 25, 50],
            rounds: vec![5, 10, 15, 20],
            mode: Mode::default(),
            seed: 42,
            bins: 100,
            overlay_samples: strand_histogram::DEFAULT_SAMPLES,
            max_parallel: std::thread::available_parallelism().map_or(4, usize::from),
            engine: EngineConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Sets the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of strands.
    #[must_use]
    pub const fn with_strands(mut self, strands: i64) -> Self {
        self.strands = strands;
        self
    }

    /// Sets the resampling mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the grid axes.
    #[must_use]
    pub fn with_grid(mut self, scaling_factors: Vec<i64>, rounds: Vec<i64>) -> Self {
        self.scaling_factors = scaling_factors;
        self.rounds = rounds;
        self
    }

    /// Sets the histogram bin count.
    #[must_use]
    pub const fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Sets the parallelism bound.
    #[must_use]
    pub const fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    /// Loads a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parses a config from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes the config to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks that the grid is non-empty and every cell has valid
    /// simulation parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for empty axes, zero bins or zero
    /// parallelism, and [`Error::Engine`] for cells the engine would reject.
    pub fn validate(&self) -> Result<()> {
        if self.scaling_factors.is_empty() {
            return Err(Error::Config("no scaling factors given".to_string()));
        }
        if self.rounds.is_empty() {
            return Err(Error::Config("no round counts given".to_string()));
        }
        if self.bins == 0 {
            return Err(Error::Config("bins must be positive".to_string()));
        }
        if self.max_parallel == 0 {
            return Err(Error::Config("max_parallel must be positive".to_string()));
        }
        for cell in self.cells() {
            cell.params(self.strands)?;
        }
        Ok(())
    }

    /// Enumerates grid cells, scaling factors outer and round counts inner.
    #[must_use]
    pub fn cells(&self) -> Vec<SweepCell> {
        self.scaling_factors
            .iter()
            .flat_map(|&c| self.rounds.iter().map(move |&r| (c, r)))
            .enumerate()
            .map(|(index, (scaling_factor, rounds))| SweepCell {
                index,
                scaling_factor,
                rounds,
                seed: derive_seed(self.seed, scaling_factor, rounds),
            })
            .collect()
    }
}

/// One point of the sweep grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepCell {
    /// Position in grid order.
    pub index: usize,
    /// Scaling factor `c`.
    pub scaling_factor: i64,
    /// Round count `R`.
    pub rounds: i64,
    /// Seed for this cell's random source.
    pub seed: u64,
}

impl SweepCell {
    /// Simulation parameters of this cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the engine rejects the parameters.
    pub fn params(&self, strands: i64) -> Result<SimParams> {
        Ok(SimParams::from_scaling_factor(
            strands,
            self.scaling_factor,
            self.rounds,
        )?)
    }
}

/// Derives a cell seed from the master seed and the cell coordinates, so the
/// seed does not depend on grid order or on which other cells exist.
pub fn derive_seed(master: u64, scaling_factor: i64, rounds: i64) -> u64 {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&scaling_factor.to_le_bytes());
    key[8..].copy_from_slice(&rounds.to_le_bytes());
    xxh64(&key, master)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_grid_has_sixteen_cells() {
        let config = SweepConfig::default();
        let cells = config.cells();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0].scaling_factor, 3);
        assert_eq!(cells[0].rounds, 5);
        assert_eq!(cells[1].rounds, 10);
        assert_eq!(cells[15].scaling_factor, 50);
        assert_eq!(cells[15].rounds, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cell_seeds_ignore_grid_shape() {
        let full = SweepConfig::default().with_seed(7);
        let narrow = SweepConfig::default()
            .with_seed(7)
            .with_grid(vec![25], vec![15]);
        let from_full = full
            .cells()
            .into_iter()
            .find(|c| c.scaling_factor == 25 && c.rounds == 15)
            .unwrap();
        assert_eq!(from_full.seed, narrow.cells()[0].seed);
    }

    #[test]
    fn cell_seeds_differ() {
        let cells = SweepConfig::default().cells();
        let mut seeds: Vec<u64> = cells.iter().map(|c| c.seed).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), cells.len());
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = SweepConfig::from_yaml("strands: 1000\nmode: renewal\nrounds: [1, 2]\n").unwrap();
        assert_eq!(config.strands, 1000);
        assert_eq!(config.mode, Mode::Renewal);
        assert_eq!(config.rounds, vec![1, 2]);
        assert_eq!(config.scaling_factors, vec![3, 10, 25, 50]);
        assert_eq!(config.bins, 100);
    }

    #[test]
    fn yaml_roundtrip_preserves_config() {
        let config = SweepConfig::default().with_strands(500).with_bins(20);
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SweepConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn validation_catches_bad_grids() {
        let empty = SweepConfig::default().with_grid(vec![], vec![5]);
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let negative = SweepConfig::default().with_grid(vec![3], vec![-1]);
        assert!(matches!(negative.validate(), Err(Error::Engine(_))));

        let no_strands = SweepConfig::default().with_strands(0);
        assert!(matches!(no_strands.validate(), Err(Error::Engine(_))));

        let no_bins = SweepConfig::default().with_bins(0);
        assert!(matches!(no_bins.validate(), Err(Error::Config(_))));
    }

    proptest! {
        #[test]
        fn cells_cover_the_grid(
            seed in any::<u64>(),
            factors in prop::collection::vec(1i64..60, 1..6),
            rounds in prop::collection::vec(0i64..30, 1..6),
        ) {
            let config = SweepConfig::default()
                .with_seed(seed)
                .with_grid(factors.clone(), rounds.clone());
            let cells = config.cells();

            prop_assert_eq!(cells.len(), factors.len() * rounds.len());
            for (i, cell) in cells.iter().enumerate() {
                prop_assert_eq!(cell.index, i);
                prop_assert_eq!(cell.scaling_factor, factors[i / rounds.len()]);
                prop_assert_eq!(cell.rounds, rounds[i % rounds.len()]);
                prop_assert_eq!(cell.seed, derive_seed(seed, cell.scaling_factor, cell.rounds));
            }
        }
    }
}
