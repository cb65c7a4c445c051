//! Error types for histogram operations.

use thiserror::Error;

/// Errors that can occur while binning or exporting counts.
#[derive(Debug, Error)]
pub enum Error {
    /// No counts to bin.
    #[error("cannot build a histogram from an empty count vector")]
    EmptyCounts,

    /// Bin count must be positive.
    #[error("invalid bin count: {0}")]
    InvalidBins(usize),

    /// Stored bin layout is inconsistent.
    #[error("malformed histogram: {0}")]
    Malformed(String),

    /// Counts have zero variance, so no normal curve can be fitted.
    #[error("counts have zero spread; normal fit is undefined")]
    DegenerateSpread,

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for histogram operations.
pub type Result<T> = std::result::Result<T, Error>;
