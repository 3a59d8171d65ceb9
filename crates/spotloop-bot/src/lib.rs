//! spotloop: single-pair buy-then-resell spot bot.
//!
//! Main application that orchestrates all components:
//! - Symbol constraint and commission resolution at startup
//! - Fatal error marker check before any cycle
//! - Sequential trade cycles through the order lifecycle manager

pub mod app;
pub mod config;
pub mod error;

pub use app::{Application, RunSummary};
pub use config::{AppConfig, TelemetryConfig, TradingConfig};
pub use error::{AppError, AppResult};
