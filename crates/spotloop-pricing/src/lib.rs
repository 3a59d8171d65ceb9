//! Order parameter calculation for spotloop.
//!
//! Derives the buy (ask) and sell (bid) prices from candles, the book top
//! and fee/profit parameters, and the order quantities from the budget and
//! symbol precision rules.

pub mod error;
pub mod price;
pub mod quantity;

pub use error::{PricingError, PricingResult};
pub use price::{PriceCalculator, Quote};
pub use quantity::QuantityCalculator;
