//! Iterative multinomial resampling engine.
//!
//! A population of `n` strands is resampled in rounds of `M` draws. Each
//! round's sampling distribution comes from the previous round's counts:
//!
//! - [`Mode::Renewal`]: only the last round's frequencies (`counts / M`)
//! - [`Mode::Accumulating`]: the running total (`counts / sum(counts)`),
//!   a rich-get-richer dynamic
//!
//! Randomness is always injected, so a seeded generator reproduces a run
//! exactly.
//!
//! # Example
//!
//! ```rust,ignore
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use strand_engine::{simulate, Mode};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let outcome = simulate(10, 1000, 5, Mode::Renewal, &mut rng)?;
//! assert_eq!(outcome.final_counts.iter().sum::<u64>(), 1000);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;
pub mod multinomial;
pub mod params;
pub mod stats;

pub use engine::{simulate, DriftPolicy, Engine, EngineConfig, RoundSnapshot, SimOutcome};
pub use error::{Error, Result};
pub use params::{Mode, SimParams};
pub use stats::{count_zero_strands, multinomial_std, CountSummary};
