//! Pricing error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type PricingResult<T> = Result<T, PricingError>;
