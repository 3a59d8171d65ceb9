//! Risk error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Error marker I/O on {path}: {source}")]
    MarkerIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RiskResult<T> = Result<T, RiskError>;
