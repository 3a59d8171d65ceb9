//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Symbol constraints or commissions could not be resolved.
    #[error("Configuration resolution error: {0}")]
    ConfigResolution(#[from] spotloop_registry::RegistryError),

    #[error("Unresolved fatal error recorded in {path}: {reason}")]
    UnresolvedError { path: String, reason: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] spotloop_executor::GatewayError),

    #[error("Cycle error: {0}")]
    Cycle(#[from] spotloop_executor::ExecutorError),
}

pub type AppResult<T> = Result<T, AppError>;
