//! The resampling recurrence.

#![allow(clippy::cast_precision_loss)] // draw totals stay far below 2^53

use crate::error::{Error, Result};
use crate::multinomial;
use crate::params::{Mode, SimParams};
use crate::stats::{count_zero_strands, CountSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default tolerance on `|sum(p) - 1|` before a draw.
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 1e-6;

/// What to do when a probability vector fails the unit-sum check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftPolicy {
    /// Rescale the vector to unit sum and continue.
    #[default]
    Renormalize,
    /// Abort the run with [`Error::NumericalDrift`].
    Reject,
}

/// Configuration for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Allowed deviation of `sum(p)` from one.
    pub drift_tolerance: f64,
    /// Action taken when the deviation exceeds the tolerance.
    pub drift_policy: DriftPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            drift_policy: DriftPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Sets the drift tolerance.
    #[must_use]
    pub const fn with_drift_tolerance(mut self, tolerance: f64) -> Self {
        self.drift_tolerance = tolerance;
        self
    }

    /// Sets the drift policy.
    #[must_use]
    pub const fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.drift_policy = policy;
        self
    }
}

/// State handed to an observer after every round.
#[derive(Debug, Clone, Copy)]
pub struct RoundSnapshot<'a> {
    /// Round index; 0 is the seeding draw.
    pub round: usize,
    /// Count vector after this round (cumulative in accumulating mode).
    pub counts: &'a [u64],
    /// Probability vector derived from `counts`.
    pub probabilities: &'a [f64],
}

/// Result of one full simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimOutcome {
    /// Mode the run used.
    pub mode: Mode,
    /// Parameters the run used.
    pub params: SimParams,
    /// Probability vector after every round, `R + 1` entries.
    pub history: Vec<Vec<f64>>,
    /// Count vector after the last round.
    pub final_counts: Vec<u64>,
}

impl SimOutcome {
    /// Probability vector after the last round.
    #[must_use]
    pub fn final_distribution(&self) -> Option<&[f64]> {
        self.history.last().map(Vec::as_slice)
    }

    /// Number of strands that ended with no draws.
    #[must_use]
    pub fn zero_strands(&self) -> usize {
        count_zero_strands(&self.final_counts)
    }

    /// Shape statistics of the final counts.
    #[must_use]
    pub fn summary(&self) -> CountSummary {
        CountSummary::from_counts(&self.final_counts)
    }
}

/// Runs the resampling recurrence.
///
/// The engine holds no per-run state, so one instance can be shared across
/// threads; every call owns its own vectors and random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a simulation and captures the full distribution history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericalDrift`] under [`DriftPolicy::Reject`] or
    /// [`Error::Sampling`] if the binomial sampler fails.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        params: &SimParams,
        mode: Mode,
        rng: &mut R,
    ) -> Result<SimOutcome> {
        let mut history = Vec::with_capacity(params.rounds() + 1);
        let final_counts = self.simulate_with(params, mode, rng, |snapshot| {
            history.push(snapshot.probabilities.to_vec());
        })?;

        Ok(SimOutcome {
            mode,
            params: *params,
            history,
            final_counts,
        })
    }

    /// Runs a simulation and returns only the final counts.
    ///
    /// # Errors
    ///
    /// See [`Engine::simulate`].
    pub fn simulate_final<R: Rng + ?Sized>(
        &self,
        params: &SimParams,
        mode: Mode,
        rng: &mut R,
    ) -> Result<Vec<u64>> {
        self.simulate_with(params, mode, rng, |_| {})
    }

    /// Runs a simulation, calling `observer` after the seeding draw and after
    /// every resampling round. Returns the final counts.
    ///
    /// # Errors
    ///
    /// See [`Engine::simulate`].
    pub fn simulate_with<R, F>(
        &self,
        params: &SimParams,
        mode: Mode,
        rng: &mut R,
        mut observer: F,
    ) -> Result<Vec<u64>>
    where
        R: Rng + ?Sized,
        F: FnMut(RoundSnapshot<'_>),
    {
        let strands = params.strands();
        let draws = params.draws_per_round();

        let mut probabilities = vec![1.0 / strands as f64; strands];
        let mut counts = Vec::with_capacity(strands);
        let mut fresh = Vec::new();

        self.check_drift(&mut probabilities, 0)?;
        multinomial::sample_into(rng, draws, &probabilities, &mut counts)?;
        let mut total = draws;
        normalize(&counts, total, &mut probabilities);
        observer(RoundSnapshot {
            round: 0,
            counts: &counts,
            probabilities: &probabilities,
        });

        for round in 1..=params.rounds() {
            self.check_drift(&mut probabilities, round)?;

            match mode {
                Mode::Renewal => {
                    multinomial::sample_into(rng, draws, &probabilities, &mut counts)?;
                    total = draws;
                }
                Mode::Accumulating => {
                    multinomial::sample_into(rng, draws, &probabilities, &mut fresh)?;
                    for (count, new) in counts.iter_mut().zip(&fresh) {
                        *count += new;
                    }
                    total += draws;
                }
            }

            normalize(&counts, total, &mut probabilities);
            debug!(
                "{} round {}/{}: {} zero strands",
                mode,
                round,
                params.rounds(),
                count_zero_strands(&counts)
            );
            observer(RoundSnapshot {
                round,
                counts: &counts,
                probabilities: &probabilities,
            });
        }

        Ok(counts)
    }

    fn check_drift(&self, probabilities: &mut [f64], round: usize) -> Result<()> {
        let sum: f64 = probabilities.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(Error::NumericalDrift { round, sum });
        }
        if (sum - 1.0).abs() <= self.config.drift_tolerance {
            return Ok(());
        }

        match self.config.drift_policy {
            DriftPolicy::Renormalize => {
                debug!("round {}: renormalizing probabilities (sum = {})", round, sum);
                for p in probabilities.iter_mut() {
                    *p /= sum;
                }
                Ok(())
            }
            DriftPolicy::Reject => Err(Error::NumericalDrift { round, sum }),
        }
    }
}

fn normalize(counts: &[u64], total: u64, probabilities: &mut [f64]) {
    let total = total as f64;
    for (p, &c) in probabilities.iter_mut().zip(counts) {
        *p = c as f64 / total;
    }
}

/// Validates raw parameters and runs a simulation with the default engine.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for `n <= 0`, `m <= 0` or `r < 0`,
/// before any sampling happens. Otherwise see [`Engine::simulate`].
pub fn simulate<R: Rng + ?Sized>(
    n: i64,
    m: i64,
    r: i64,
    mode: Mode,
    rng: &mut R,
) -> Result<SimOutcome> {
    let params = SimParams::new(n, m, r)?;
    Engine::default().simulate(&params, mode, rng)
}
