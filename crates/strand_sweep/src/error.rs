//! Error types for sweep operations.

use thiserror::Error;

/// Errors that can occur while configuring or running a sweep.
#[derive(Debug, Error)]
pub enum Error {
    /// Sweep configuration is unusable.
    #[error("invalid sweep config: {0}")]
    Config(String),

    /// A simulation run failed.
    #[error(transparent)]
    Engine(#[from] strand_engine::Error),

    /// Histogram construction or export failed.
    #[error(transparent)]
    Histogram(#[from] strand_histogram::Error),

    /// A worker task panicked or was cancelled.
    #[error("sweep worker failed: {0}")]
    Join(String),

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sweep operations.
pub type Result<T> = std::result::Result<T, Error>;
