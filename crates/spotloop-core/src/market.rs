//! Resolved exchange rules for the traded symbol.
//!
//! `SymbolConstraints` and `Commissions` are produced once by the registry
//! resolvers and are immutable afterwards.

use crate::{Price, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Precision and minimum-order rules for one trading pair.
///
/// Every price and quantity sent to the exchange is truncated to the
/// declared number of decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolConstraints {
    /// Decimal places allowed in a price (from the tick size).
    pub price_decimal_places: u32,

    /// Decimal places allowed in a quantity (from the step size).
    pub quantity_decimal_places: u32,

    /// Smallest quantity increment used to compensate for truncation.
    pub min_quantity_increment: Size,

    /// Minimum order value (price * quantity) in quote asset.
    pub min_notional_value: Decimal,
}

impl SymbolConstraints {
    /// Truncate a price to exchange precision.
    pub fn price(&self, price: Price) -> Price {
        price.truncate_dp(self.price_decimal_places)
    }

    /// Truncate a quantity to exchange precision.
    pub fn quantity(&self, size: Size) -> Size {
        size.truncate_dp(self.quantity_decimal_places)
    }

    /// Check whether an order clears the minimum notional.
    pub fn meets_min_notional(&self, size: Size, price: Price) -> bool {
        size.notional(price) >= self.min_notional_value
    }
}

/// Account fee rates, expressed in percent (0.1 = 0.1%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commissions {
    /// Fee for orders that add liquidity.
    pub maker_percent: Decimal,
    /// Fee for orders that take liquidity.
    pub taker_percent: Decimal,
}

impl Commissions {
    pub fn new(maker_percent: Decimal, taker_percent: Decimal) -> Self {
        Self {
            maker_percent,
            taker_percent,
        }
    }

    /// Fees paid across a full buy-then-sell round trip.
    pub fn round_trip_percent(&self) -> Decimal {
        self.maker_percent + self.taker_percent
    }

    /// The larger of the two rates. Used wherever the fee side is not known.
    pub fn worst_percent(&self) -> Decimal {
        self.maker_percent.max(self.taker_percent)
    }
}
