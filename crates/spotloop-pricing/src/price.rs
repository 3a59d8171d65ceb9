//! Ask/bid price calculation.
//!
//! Ask = mean close of the candle window, lowered to the best ask when the
//! book offers cheaper liquidity. Bid = ask marked up by both legs' fees
//! plus the profit margin. Neither price is truncated here; precision is
//! applied when an order is built.

use crate::error::{PricingError, PricingResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotloop_core::{BookTop, Candle, Commissions, Price};
use tracing::debug;

/// Target prices for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Buy price.
    pub ask: Price,
    /// Resale price.
    pub bid: Price,
}

/// Computes the cycle's target prices.
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    commissions: Commissions,
    profit_percent: Decimal,
}

impl PriceCalculator {
    pub fn new(commissions: Commissions, profit_percent: Decimal) -> Self {
        Self {
            commissions,
            profit_percent,
        }
    }

    /// Mean close of `candles`, or the book's best ask if strictly lower.
    pub fn ask_price(book: &BookTop, candles: &[Candle]) -> PricingResult<Price> {
        if candles.is_empty() {
            return Err(PricingError::DataUnavailable(
                "no candles to average".to_string(),
            ));
        }

        let mut sum = Decimal::ZERO;
        for candle in candles {
            if !candle.close.is_positive() {
                return Err(PricingError::DataUnavailable(format!(
                    "candle {} has no usable close ({})",
                    candle.open_time, candle.close
                )));
            }
            sum += candle.close.inner();
        }
        let mean = Price::new(sum / Decimal::from(candles.len()));

        match book.best_ask {
            Some(best_ask) if best_ask < mean => Ok(best_ask),
            _ => Ok(mean),
        }
    }

    /// `ask * (1 + (maker + taker + profit) / 100)`.
    pub fn bid_price(ask: Price, commissions: &Commissions, profit_percent: Decimal) -> Price {
        ask.markup(commissions.round_trip_percent() + profit_percent)
    }

    /// Both target prices from live market data.
    pub fn quote(&self, book: &BookTop, candles: &[Candle]) -> PricingResult<Quote> {
        let ask = Self::ask_price(book, candles)?;
        let bid = Self::bid_price(ask, &self.commissions, self.profit_percent);

        debug!(
            ask = %ask,
            bid = %bid,
            best_ask = ?book.best_ask.map(|p| p.to_string()),
            candles = candles.len(),
            "Quote computed"
        );

        Ok(Quote { ask, bid })
    }
}
