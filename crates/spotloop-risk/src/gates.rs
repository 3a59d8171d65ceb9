//! Pre-trade gates.
//!
//! A gate never raises an error for market conditions: `Block` means
//! "skip this iteration", the caller backs off and re-evaluates.

use spotloop_core::Price;
use tracing::trace;

/// Result of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Gate passed.
    Pass,
    /// Gate blocked with reason.
    Block(String),
}

impl GateResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}

/// Sanity gate: refuse to buy above the exchange's rolling daily average.
///
/// Compares the computed ask price, before it is truncated to tick precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyAverageGate;

impl DailyAverageGate {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, ask_price: Price, daily_average: Price) -> GateResult {
        trace!(ask = %ask_price, daily_average = %daily_average, "Daily average gate");

        if ask_price > daily_average {
            GateResult::Block(format!(
                "ask {ask_price} above daily average {daily_average}"
            ))
        } else {
            GateResult::Pass
        }
    }
}
