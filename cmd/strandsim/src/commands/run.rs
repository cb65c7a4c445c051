//! Run command implementation.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use strand_engine::{count_zero_strands, CountSummary, Engine, Mode, SimParams};
use strand_histogram::{render_text, Histogram, NormalOverlay, DEFAULT_SAMPLES, DEFAULT_WIDTH};
use strand_sweep::fingerprint;
use tracing::{info, warn};

/// Scaling factors the simulation is calibrated for.
const CALIBRATED_SCALING: std::ops::RangeInclusive<i64> = 3..=50;

/// Options for the run command.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub strands: i64,
    pub scaling_factor: i64,
    pub rounds: i64,
    pub mode: Mode,
    pub seed: Option<u64>,
    pub plot: bool,
    pub bins: usize,
    pub histogram_out: Option<String>,
    pub per_round: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    strands: usize,
    scaling_factor: i64,
    draws_per_round: u64,
    rounds: usize,
    mode: Mode,
    seed: u64,
    fingerprint: String,
    summary: CountSummary,
}

/// Runs the run command.
pub fn run(opts: &RunOptions) -> Result<()> {
    let params = SimParams::from_scaling_factor(opts.strands, opts.scaling_factor, opts.rounds)
        .with_context(|| "Invalid simulation parameters")?;

    if !CALIBRATED_SCALING.contains(&opts.scaling_factor) {
        warn!(
            "Scaling factor {} is outside the calibrated range {}..={}",
            opts.scaling_factor,
            CALIBRATED_SCALING.start(),
            CALIBRATED_SCALING.end()
        );
    }

    let seed = opts.seed.unwrap_or_else(rand::random);
    info!("Running {} simulation (seed {})", opts.mode, seed);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let per_round = opts.per_round;
    let counts = Engine::default()
        .simulate_with(&params, opts.mode, &mut rng, |snapshot| {
            if per_round {
                let peak = snapshot.probabilities.iter().copied().fold(0.0, f64::max);
                println!(
                    "round {:>4}: {:>8} zero strands, max p = {:.3e}",
                    snapshot.round,
                    count_zero_strands(snapshot.counts),
                    peak
                );
            }
        })
        .with_context(|| "Simulation failed")?;

    let summary = CountSummary::from_counts(&counts);

    if opts.json {
        let report = RunSummary {
            strands: params.strands(),
            scaling_factor: opts.scaling_factor,
            draws_per_round: params.draws_per_round(),
            rounds: params.rounds(),
            mode: opts.mode,
            seed,
            fingerprint: fingerprint(&counts),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Simulation ({} mode):", opts.mode);
        println!("  Number of strands (n):     {}", params.strands());
        println!("  Scaling factor (c):        {}", opts.scaling_factor);
        println!("  Sample size per round (M): {}", params.draws_per_round());
        println!("  Number of rounds (R):      {}", params.rounds());
        println!("Number of strands with zero count: {}", summary.zero_strands);
        println!(
            "Mean {:.2}, std dev {:.2}, skew {:.3}, excess kurtosis {:.3}",
            summary.mean, summary.std_dev, summary.skewness, summary.excess_kurtosis
        );
    }

    if opts.plot || opts.histogram_out.is_some() {
        let histogram = Histogram::from_counts(&counts, opts.bins)
            .with_context(|| "Failed to build histogram")?;

        if opts.plot {
            let overlay = NormalOverlay::fit(&counts, &histogram, DEFAULT_SAMPLES).ok();
            println!();
            println!("Histogram of strand counts in final round");
            print!("{}", render_text(&histogram, overlay.as_ref(), DEFAULT_WIDTH));
        }

        if let Some(path) = &opts.histogram_out {
            strand_histogram::save_histogram_csv(&histogram, path)
                .with_context(|| format!("Failed to write histogram: {path}"))?;
            info!("Histogram written to: {}", path);
        }
    }

    Ok(())
}
