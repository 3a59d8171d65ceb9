//! Order quantity calculation.
//!
//! Quantities leave this module already at exchange precision: their text
//! carries exactly `quantity_decimal_places` fractional digits.

use crate::error::{PricingError, PricingResult};
use rust_decimal::Decimal;
use spotloop_core::{Price, Size, SymbolConstraints};
use tracing::debug;

/// Computes buy and sell quantities for one symbol.
///
/// `commission_percent` is the conservative fee rate, `max(maker, taker)`.
#[derive(Debug, Clone)]
pub struct QuantityCalculator {
    constraints: SymbolConstraints,
    commission_percent: Decimal,
}

impl QuantityCalculator {
    pub fn new(constraints: SymbolConstraints, commission_percent: Decimal) -> Self {
        Self {
            constraints,
            commission_percent,
        }
    }

    pub fn constraints(&self) -> &SymbolConstraints {
        &self.constraints
    }

    /// Buy quantity for `budget` at `ask`.
    ///
    /// 1. `raw = budget / ask`
    /// 2. If the post-fee holding resold at `bid` misses the minimum
    ///    notional, add one increment to `raw`.
    /// 3. Truncate to quantity precision; if that cut anything off, add one
    ///    increment back.
    ///
    /// Over-buying by one increment is preferred to an unsellable holding.
    pub fn ask_quantity(&self, budget: Decimal, ask: Price, bid: Price) -> PricingResult<Size> {
        if !ask.is_positive() {
            return Err(PricingError::InvalidInput(format!(
                "ask price must be positive, got {ask}"
            )));
        }
        if budget.is_sign_negative() || budget.is_zero() {
            return Err(PricingError::InvalidInput(format!(
                "buy budget must be positive, got {budget}"
            )));
        }

        let dp = self.constraints.quantity_decimal_places;
        let increment = self.constraints.min_quantity_increment;

        let mut raw = Size::new(budget / ask.inner());

        let resale = raw.less_percent(self.commission_percent);
        if !self.constraints.meets_min_notional(resale, bid) {
            debug!(
                raw = %raw,
                resale_notional = %resale.notional(bid),
                min_notional = %self.constraints.min_notional_value,
                "Resale below min notional, bumping quantity"
            );
            raw = raw + increment;
        }

        let truncated = raw.truncate_dp(dp);
        let quantity = if truncated < raw {
            (truncated + increment).truncate_dp(dp)
        } else {
            truncated
        };

        debug!(budget = %budget, ask = %ask, quantity = %quantity, "Ask quantity");
        Ok(quantity)
    }

    /// Sell quantity for a `purchased` amount whose fee was charged in the
    /// base asset.
    ///
    /// Rounds the post-fee holding half away from zero; if that rounded up,
    /// steps back one increment so the order never exceeds what is held.
    pub fn bid_quantity(&self, purchased: Size) -> PricingResult<Size> {
        let dp = self.constraints.quantity_decimal_places;
        let held = purchased.less_percent(self.commission_percent);
        let rounded = held.round_dp(dp);

        let quantity = if rounded > held {
            (rounded - self.constraints.min_quantity_increment).truncate_dp(dp)
        } else {
            rounded
        };

        if !quantity.is_positive() {
            return Err(PricingError::InvalidInput(format!(
                "sell quantity for {purchased} purchased is not positive ({quantity})"
            )));
        }

        debug!(purchased = %purchased, quantity = %quantity, "Bid quantity");
        Ok(quantity)
    }
}
