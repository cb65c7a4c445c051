//! Parameter sweeps over the strandsim engine.
//!
//! A sweep runs every `(c, R)` cell of a scaling-factor × round-count grid:
//! - Each cell gets its own seed derived from the master seed
//! - Cells fan out over tokio's blocking pool with bounded parallelism
//! - Results are characterized by summary stats, a histogram and a normal fit
//! - Final counts are fingerprinted so reruns can be compared
//!
//! # Example
//!
//! ```rust,ignore
//! use strand_sweep::{run_sweep, SweepConfig};
//!
//! let report = run_sweep(SweepConfig::default().with_seed(7)).await?;
//! println!("{report}");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod harness;
pub mod report;

pub use config::{derive_seed, SweepCell, SweepConfig};
pub use error::{Error, Result};
pub use harness::{run_cell, run_sweep, run_sweep_sequential, verify_determinism};
pub use report::{fingerprint, CellResult, SweepReport};
