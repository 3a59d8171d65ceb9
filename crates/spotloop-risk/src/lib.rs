//! Pre-trade gates for spotloop.
//!
//! Implements the checks evaluated before each buy leg:
//! - Volatility: no unbroken rising or falling run across the recent candles
//! - DailyAverage: buy price not above the exchange's rolling average
//!
//! A blocked gate is an expected condition, not an error: the cycle waits
//! one poll interval and re-evaluates.
//!
//! Also provides:
//! - ErrorMarker: persistent fatal-error latch checked at startup

pub mod error;
pub mod gates;
pub mod hard_stop;
pub mod volatility;

pub use error::{RiskError, RiskResult};
pub use gates::{DailyAverageGate, GateResult};
pub use hard_stop::ErrorMarker;
pub use volatility::{is_volatile, VolatilityFilter};
