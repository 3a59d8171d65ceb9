//! Prometheus metrics and structured logging for spotloop.
//!
//! - Structured logging with tracing (pretty or JSON)
//! - Per-cycle log deduplication for repeating gate messages
//! - Prometheus counters for cycles, gates, orders and partial fills

pub mod error;
pub mod logging;
pub mod metrics;
pub mod one_log;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use one_log::CycleLog;
