//! Error types for engine operations.

use thiserror::Error;

/// Errors that can occur while running a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// A simulation parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A probability vector drifted away from unit sum beyond tolerance.
    #[error("numerical drift in round {round}: probabilities sum to {sum}")]
    NumericalDrift {
        /// Round whose draw was about to be taken.
        round: usize,
        /// Observed sum of the probability vector.
        sum: f64,
    },

    /// The binomial sampler rejected its parameters.
    #[error("sampling error: {0}")]
    Sampling(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
