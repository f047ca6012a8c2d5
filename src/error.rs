//! Error types for marble-world.
//!
//! Configuration problems abort the affected trial only; batch drivers log
//! them and continue with the next combination. I/O and serialization
//! failures abort the invoking batch operation, since a partially readable
//! result set would silently corrupt downstream statistics. Numerical
//! divergence during a run is not an error at all: it is reported as a
//! flagged "missed" outcome so sweeps always complete.

use thiserror::Error;

/// Result type alias for marble-world operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for configuration and batch I/O failures.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or inconsistent trial configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// File I/O failure while reading configuration or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
