//! Core domain types for the spotloop bot.
//!
//! This crate provides fundamental types used throughout the trading system:
//! - `Price`, `Size`: Precision-safe numeric types with exchange rounding
//! - `Candle`, `BookTop`: Market data consumed by the calculators
//! - `SymbolConstraints`, `Commissions`: Resolved exchange rules
//! - `Order`, `OrderRequest`, `OrderStatus`: Order lifecycle types

pub mod decimal;
pub mod error;
pub mod market;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use market::{Commissions, SymbolConstraints};
pub use order::{Order, OrderId, OrderRequest, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use types::{BookTop, Candle};
