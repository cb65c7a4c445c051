//! strandsim CLI - iterative multinomial resampling simulator.
//!
//! Commands:
//! - `strandsim run` - Run one simulation and report the final counts
//! - `strandsim sweep` - Run a scaling-factor × round-count grid
//! - `strandsim init` - Write a default sweep config

use anyhow::Result;
use clap::{Parser, Subcommand};
use strand_engine::Mode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "strandsim")]
#[command(about = "Iterative multinomial resampling simulator")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        /// Number of strands (n)
        #[arg(short = 'n', long, default_value_t = 100_000, allow_negative_numbers = true)]
        strands: i64,

        /// Scaling factor (c) for M = c * n, calibrated for 3 <= c <= 50
        #[arg(short = 'c', long, default_value_t = 1, allow_negative_numbers = true)]
        scaling_factor: i64,

        /// Number of sampling rounds after the seeding draw (R)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        rounds: i64,

        /// Resampling mode (accumulating or renewal)
        #[arg(short, long, default_value = "accumulating")]
        mode: Mode,

        /// Random seed (random if omitted)
        #[arg(short, long, env = "STRANDSIM_SEED")]
        seed: Option<u64>,

        /// Render a histogram of the final counts (true/false)
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        plot: bool,

        /// Histogram bin count
        #[arg(short, long, default_value_t = strand_histogram::DEFAULT_BINS)]
        bins: usize,

        /// Write the histogram as CSV to this path
        #[arg(long)]
        histogram_out: Option<String>,

        /// Print a line per round
        #[arg(long)]
        per_round: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a parameter sweep
    Sweep {
        /// Path to a sweep config (YAML); defaults are used if omitted
        #[arg(long)]
        config: Option<String>,

        /// Override the number of strands
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        strands: Option<i64>,

        /// Override the resampling mode
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Override the master seed
        #[arg(short, long, env = "STRANDSIM_SEED")]
        seed: Option<u64>,

        /// Maximum number of cells running at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Directory for report.json and per-cell CSVs
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Render each cell's histogram
        #[arg(long)]
        plot: bool,
    },

    /// Write a default sweep config
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            strands,
            scaling_factor,
            rounds,
            mode,
            seed,
            plot,
            bins,
            histogram_out,
            per_round,
            json,
        } => commands::run::run(&commands::run::RunOptions {
            strands,
            scaling_factor,
            rounds,
            mode,
            seed,
            plot,
            bins,
            histogram_out,
            per_round,
            json,
        }),
        Commands::Sweep {
            config,
            strands,
            mode,
            seed,
            jobs,
            output_dir,
            plot,
        } => {
            commands::sweep::run(commands::sweep::SweepOptions {
                config,
                strands,
                mode,
                seed,
                jobs,
                output_dir,
                plot,
            })
            .await
        }
        Commands::Init { path } => commands::init::run(&path),
    }
}
