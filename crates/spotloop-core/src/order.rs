//! Order-related types and identifiers.
//!
//! Provides order side, type, status and the order snapshot returned by the
//! exchange. The exchange is the source of truth for an order's state: an
//! `Order` value is only ever replaced by a fresh read, never edited locally.

use crate::error::CoreError;
use crate::{Price, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Exchange wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(CoreError::UnknownSide(other.to_string())),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order. The only type the trade cycle submits.
    #[default]
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
        }
    }
}

/// Time-in-force for limit orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-til-cancelled: the order rests until filled.
    #[default]
    #[serde(rename = "GTC")]
    GoodTilCancelled,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTilCancelled => "GTC",
        }
    }
}

/// Order status as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted and resting.
    New,
    /// Some quantity executed.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Refused by the exchange.
    Rejected,
    /// Any other exchange status (canceled, expired, ...), kept verbatim.
    Other(String),
}

impl OrderStatus {
    /// Parse the exchange's status string. Unknown values map to `Other`.
    pub fn from_exchange(s: &str) -> Self {
        match s {
            "NEW" => Self::New,
            "PARTIALLY_FILLED" => Self::PartiallyFilled,
            "FILLED" => Self::Filled,
            "REJECTED" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }

    /// Exchange wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Rejected => "REJECTED",
            Self::Other(s) => s,
        }
    }

    /// True if any quantity was executed.
    pub fn has_fills(&self) -> bool {
        matches!(self, Self::Filled | Self::PartiallyFilled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Order submission parameters.
///
/// Price and quantity must already be truncated to symbol precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub quantity: Size,
    pub price: Price,
}

impl OrderRequest {
    /// Create a good-til-cancelled limit order.
    pub fn limit(symbol: impl Into<String>, side: OrderSide, quantity: Size, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::GoodTilCancelled,
            quantity,
            price,
        }
    }
}

/// Snapshot of an order as last read from the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub status: OrderStatus,
    pub requested_quantity: Size,
    pub requested_price: Price,
    pub executed_quantity: Size,
    /// Whether the order is still open on the book.
    pub is_working: bool,
}

impl Order {
    /// Requested minus executed quantity.
    pub fn remaining_quantity(&self) -> Size {
        self.requested_quantity - self.executed_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_side_parse() {
        assert_eq!("BUY".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!(matches!(
            "HOLD".parse::<OrderSide>(),
            Err(CoreError::UnknownSide(side)) if side == "HOLD"
        ));
    }

    #[test]
    fn test_order_status_from_exchange() {
        assert_eq!(OrderStatus::from_exchange("NEW"), OrderStatus::New);
        assert_eq!(
            OrderStatus::from_exchange("PARTIALLY_FILLED"),
            OrderStatus::PartiallyFilled
        );
        assert_eq!(OrderStatus::from_exchange("FILLED"), OrderStatus::Filled);
        assert_eq!(OrderStatus::from_exchange("REJECTED"), OrderStatus::Rejected);

        let canceled = OrderStatus::from_exchange("CANCELED");
        assert_eq!(canceled, OrderStatus::Other("CANCELED".to_string()));
        assert_eq!(canceled.as_str(), "CANCELED");
        assert!(!canceled.has_fills());
    }

    #[test]
    fn test_order_remaining_quantity() {
        let order = Order {
            id: OrderId(1),
            side: OrderSide::Sell,
            status: OrderStatus::PartiallyFilled,
            requested_quantity: Size::new(dec!(10)),
            requested_price: Price::new(dec!(100.5)),
            executed_quantity: Size::new(dec!(3)),
            is_working: false,
        };
        assert_eq!(order.remaining_quantity(), Size::new(dec!(7)));
    }

    #[test]
    fn test_order_request_wire_names() {
        let req = OrderRequest::limit(
            "BTCUSDT",
            OrderSide::Buy,
            Size::new(dec!(0.001)),
            Price::new(dec!(27000)),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["order_type"], "LIMIT");
        assert_eq!(json["time_in_force"], "GTC");
    }
}
