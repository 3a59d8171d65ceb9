//! Exchange gateway trait.
//!
//! Abstracts the exchange operations the trade cycle consumes, so the
//! cycle can run against the live REST API or a scripted fake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use spotloop_core::{BookTop, Candle, Order, OrderId, OrderRequest, Price};
use spotloop_registry::{RawAccountInfo, RawSymbolInfo};
use thiserror::Error;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Gateway failure.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Transport failure or unexpected HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Exchange answered with an error body.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or unusable API credentials.
    #[error("Auth error: {0}")]
    Auth(String),

    /// A scripted gateway ran out of responses.
    #[error("Script exhausted for {0}")]
    Exhausted(&'static str),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Exchange operations consumed by the trade cycle.
///
/// Every call is a single request/response; implementations do not retry.
pub trait ExchangeGateway: Send + Sync {
    /// Most recent `limit` candles of `interval`, oldest first.
    fn candles<'a>(
        &'a self,
        symbol: &'a str,
        interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, GatewayResult<Vec<Candle>>>;

    /// Best ask and best bid.
    fn book_top<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<BookTop>>;

    /// Exchange-reported rolling average price.
    fn daily_average_price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>>;

    /// Symbol metadata with its filter set.
    fn symbol_info<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<RawSymbolInfo>>;

    /// Account metadata with commission fields.
    fn account_info(&self) -> BoxFuture<'_, GatewayResult<RawAccountInfo>>;

    /// Submit an order. The returned order carries its status at placement.
    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<Order>>;

    /// Fresh read of an order.
    fn get_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: OrderId,
    ) -> BoxFuture<'a, GatewayResult<Order>>;
}

/// Arc wrapper for gateway trait objects.
pub type DynGateway = Arc<dyn ExchangeGateway>;
