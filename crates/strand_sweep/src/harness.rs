//! Runs sweep cells, sequentially or fanned out over worker threads.
//!
//! Every cell owns a `ChaCha8Rng` seeded from its derived seed, so results
//! depend only on the cell and never on scheduling.

use crate::config::{SweepCell, SweepConfig};
use crate::error::{Error, Result};
use crate::report::{fingerprint, CellResult, SweepReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;
use strand_engine::{CountSummary, Engine, Mode, SimParams};
use strand_histogram::{Histogram, NormalOverlay};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs one grid cell to completion on the current thread.
///
/// # Errors
///
/// Returns an error if the cell parameters are invalid or the engine or
/// histogram fails.
pub fn run_cell(config: &SweepConfig, cell: &SweepCell) -> Result<CellResult> {
    let start = Instant::now();
    let params = cell.params(config.strands)?;
    let mut rng = ChaCha8Rng::seed_from_u64(cell.seed);

    let counts = Engine::new(config.engine).simulate_final(&params, config.mode, &mut rng)?;

    let summary = CountSummary::from_counts(&counts);
    let histogram = Histogram::from_counts(&counts, config.bins)?;
    let overlay = match NormalOverlay::fit(&counts, &histogram, config.overlay_samples) {
        Ok(overlay) => Some(overlay),
        Err(e) => {
            warn!("c = {}, R = {}: no normal fit: {}", cell.scaling_factor, cell.rounds, e);
            None
        }
    };

    info!(
        "c = {}, R = {}: {} zero strands, std dev {:.2} ({:?})",
        cell.scaling_factor,
        cell.rounds,
        summary.zero_strands,
        summary.std_dev,
        start.elapsed()
    );

    Ok(CellResult {
        index: cell.index,
        scaling_factor: cell.scaling_factor,
        draws_per_round: params.draws_per_round(),
        rounds: params.rounds(),
        seed: cell.seed,
        summary,
        histogram,
        overlay,
        fingerprint: fingerprint(&counts),
    })
}

/// Runs every cell one after another.
///
/// # Errors
///
/// Returns the first cell error, or a config error if validation fails.
pub fn run_sweep_sequential(config: &SweepConfig) -> Result<SweepReport> {
    config.validate()?;
    let cells = config
        .cells()
        .iter()
        .map(|cell| run_cell(config, cell))
        .collect::<Result<Vec<_>>>()?;
    Ok(report(config, cells))
}

/// Runs every cell on tokio's blocking pool, at most `max_parallel` at a
/// time, and returns results in grid order.
///
/// # Errors
///
/// Returns the first cell error, a config error if validation fails, or
/// [`Error::Join`] if a worker panics. Blocking workers cannot be aborted, so
/// every dispatched cell is awaited before an error is returned.
pub async fn run_sweep(config: SweepConfig) -> Result<SweepReport> {
    config.validate()?;
    let cells = config.cells();
    info!(
        "sweeping {} cells ({} mode, n = {}, up to {} in parallel)",
        cells.len(),
        config.mode,
        config.strands,
        config.max_parallel
    );

    let config = Arc::new(config);
    let permits = Arc::new(Semaphore::new(config.max_parallel));
    let mut workers = JoinSet::new();

    for cell in cells {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .map_err(|e| Error::Join(e.to_string()))?;
        let config = Arc::clone(&config);
        debug!("dispatching cell {} (seed {:#x})", cell.index, cell.seed);
        workers.spawn_blocking(move || {
            let _permit = permit;
            run_cell(&config, &cell)
        });
    }

    let mut results = Vec::with_capacity(workers.len());
    let mut first_error = None;
    while let Some(joined) = workers.join_next().await {
        match joined.map_err(|e| Error::Join(e.to_string())).and_then(|r| r) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!("sweep cell failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }
    results.sort_by_key(|r| r.index);

    Ok(report(&config, results))
}

/// Runs the same simulation twice from `seed` and checks that both runs
/// produce identical final counts.
///
/// # Errors
///
/// Returns an error if either run fails.
pub fn verify_determinism(params: &SimParams, mode: Mode, seed: u64) -> Result<bool> {
    let engine = Engine::default();
    let first = engine.simulate_final(params, mode, &mut ChaCha8Rng::seed_from_u64(seed))?;
    let second = engine.simulate_final(params, mode, &mut ChaCha8Rng::seed_from_u64(seed))?;
    Ok(fingerprint(&first) == fingerprint(&second))
}

fn report(config: &SweepConfig, cells: Vec<CellResult>) -> SweepReport {
    // `validate` has already rejected non-positive strand counts.
    let strands = usize::try_from(config.strands).unwrap_or_default();
    SweepReport::new(config.mode, strands, config.seed, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_engine::{DriftPolicy, EngineConfig};

    fn small_config() -> SweepConfig {
        SweepConfig::default()
            .with_strands(500)
            .with_grid(vec![3, 10], vec![0, 2, 4])
            .with_bins(20)
            .with_seed(2024)
            .with_max_parallel(3)
    }

    #[test]
    fn cell_conserves_mass() {
        let config = small_config().with_mode(Mode::Accumulating);
        for cell in config.cells() {
            let result = run_cell(&config, &cell).unwrap();
            let rounds = u64::try_from(result.rounds).unwrap();
            assert_eq!(result.summary.total, result.draws_per_round * (rounds + 1));
            assert_eq!(result.histogram.strands().iter().sum::<u64>(), 500);
        }
    }

    #[test]
    fn renewal_cell_totals_one_round() {
        let config = small_config().with_mode(Mode::Renewal);
        let cell = config.cells()[2];
        let result = run_cell(&config, &cell).unwrap();
        assert_eq!(result.summary.total, 1_500);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn parallel_sweep_matches_sequential() {
        let config = small_config();
        let sequential = run_sweep_sequential(&config).unwrap();
        let parallel = run_sweep(config).await.unwrap();

        assert_eq!(parallel.cells.len(), 6);
        for (a, b) in sequential.cells.iter().zip(&parallel.cells) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.fingerprint, b.fingerprint);
        }
    }

    #[tokio::test]
    async fn results_come_back_in_grid_order() {
        let report = run_sweep(small_config()).await.unwrap();
        let indices: Vec<usize> = report.cells.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(report.cell(10, 4).is_some());
    }

    #[tokio::test]
    async fn invalid_config_fails_before_running() {
        let config = small_config().with_grid(vec![3], vec![-2]);
        assert!(run_sweep(config).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failing_cells_report_the_engine_error() {
        let mut config = small_config().with_max_parallel(2);
        config.engine = EngineConfig::default()
            .with_drift_tolerance(-1.0)
            .with_drift_policy(DriftPolicy::Reject);

        let err = run_sweep(config).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Engine(strand_engine::Error::NumericalDrift { round: 0, .. })
        ));
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let params = SimParams::new(100, 1_000, 5).unwrap();
        assert!(verify_determinism(&params, Mode::Renewal, 12_345).unwrap());
        assert!(verify_determinism(&params, Mode::Accumulating, 12_345).unwrap());
    }
}
