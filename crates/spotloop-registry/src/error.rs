//! Registry error types.
//!
//! Every variant is a configuration-resolution failure: fatal at startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Symbol filter missing: {0}")]
    MissingFilter(&'static str),

    #[error("Symbol filter field missing: {0}")]
    MissingField(&'static str),

    #[error("Filter parse error: {0}")]
    ParseError(String),

    #[error("Symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("Symbol {symbol} is not trading (status {status})")]
    NotTrading { symbol: String, status: String },

    #[error("Commission unavailable: {0}")]
    CommissionUnavailable(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
