//! Market data types consumed by the trade cycle.
//!
//! Contains candles (close prices in chronological order) and the
//! top-of-book snapshot.

use crate::Price;
use serde::{Deserialize, Serialize};

/// One kline of the configured interval.
///
/// Only the fields the bot reasons about are kept: the open time for
/// ordering/diagnostics and the close price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time (Unix milliseconds).
    pub open_time: i64,
    /// Close price.
    pub close: Price,
}

impl Candle {
    pub fn new(open_time: i64, close: Price) -> Self {
        Self { open_time, close }
    }
}

/// Top of the order book.
///
/// Either side may be missing when the book is empty on that side.
/// A zero price is normalized to `None` by [`BookTop::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookTop {
    /// Lowest resting sell price.
    pub best_ask: Option<Price>,
    /// Highest resting buy price.
    pub best_bid: Option<Price>,
}

impl BookTop {
    /// Create a snapshot, dropping non-positive prices.
    pub fn new(best_ask: Option<Price>, best_bid: Option<Price>) -> Self {
        Self {
            best_ask: best_ask.filter(Price::is_positive),
            best_bid: best_bid.filter(Price::is_positive),
        }
    }

    /// Snapshot with no liquidity on either side.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if neither side has liquidity.
    pub fn is_empty(&self) -> bool {
        self.best_ask.is_none() && self.best_bid.is_none()
    }
}
