//! Sweep command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use strand_engine::Mode;
use strand_histogram::{render_text, DEFAULT_WIDTH};
use strand_sweep::{run_sweep, SweepConfig};
use tracing::{info, warn};

/// Options for the sweep command.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    pub config: Option<String>,
    pub strands: Option<i64>,
    pub mode: Option<Mode>,
    pub seed: Option<u64>,
    pub jobs: Option<usize>,
    pub output_dir: Option<String>,
    pub plot: bool,
}

/// Runs the sweep command.
pub async fn run(opts: SweepOptions) -> Result<()> {
    let config = resolve_config(&opts)?;
    let report = run_sweep(config).await.with_context(|| "Sweep failed")?;

    println!("{report}");

    if opts.plot {
        for cell in &report.cells {
            println!(
                "Scaling factor c = {}, rounds = {}",
                cell.scaling_factor, cell.rounds
            );
            print!(
                "{}",
                render_text(&cell.histogram, cell.overlay.as_ref(), DEFAULT_WIDTH)
            );
            println!();
        }
    }

    if let Some(dir) = &opts.output_dir {
        let written = report
            .save(dir)
            .with_context(|| format!("Failed to write sweep output to: {dir}"))?;
        info!("Wrote {} files to: {}", written.len(), dir);
    }

    Ok(())
}

fn resolve_config(opts: &SweepOptions) -> Result<SweepConfig> {
    let mut config = match &opts.config {
        Some(path) => load_config(path)?,
        None => SweepConfig::default(),
    };

    if let Some(strands) = opts.strands {
        config = config.with_strands(strands);
    }
    if let Some(mode) = opts.mode {
        config = config.with_mode(mode);
    }
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    if let Some(jobs) = opts.jobs {
        config = config.with_max_parallel(jobs);
    }

    config.validate().with_context(|| "Invalid sweep config")?;
    Ok(config)
}

fn load_config(path: &str) -> Result<SweepConfig> {
    if !Path::new(path).exists() {
        warn!("Sweep config not found: {}. Using defaults.", path);
        return Ok(SweepConfig::default());
    }
    info!("Loading sweep config: {}", path);
    SweepConfig::load(path).with_context(|| format!("Failed to load sweep config: {path}"))
}
