//! Binance spot REST gateway.
//!
//! Public market data comes from unsigned endpoints. Account and order
//! endpoints are signed: the query string gets `timestamp` and
//! `recvWindow`, is signed with HMAC-SHA256 (hex) and the API key is sent
//! in the `X-MBX-APIKEY` header.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use spotloop_core::{
    BookTop, Candle, Order, OrderId, OrderRequest, OrderSide, OrderStatus, Price, Size,
};
use spotloop_registry::{RawAccountInfo, RawExchangeInfo, RawSymbolInfo};
use tracing::{debug, warn};

use crate::gateway::{BoxFuture, ExchangeGateway, GatewayError, GatewayResult};

const API_KEY_ENV: &str = "SPOTLOOP_API_KEY";
const API_SECRET_ENV: &str = "SPOTLOOP_API_SECRET";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API key pair.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read `SPOTLOOP_API_KEY` / `SPOTLOOP_API_SECRET`.
    pub fn from_env() -> GatewayResult<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| GatewayError::Auth(format!("{name} not set")))
        };
        Ok(Self::new(read(API_KEY_ENV)?, read(API_SECRET_ENV)?))
    }

    /// Hex HMAC-SHA256 of `query`.
    fn sign(&self, query: &str) -> GatewayResult<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| GatewayError::Auth(format!("invalid secret key: {e}")))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct DepthResponse {
    #[serde(default)]
    bids: Vec<(String, String)>,
    #[serde(default)]
    asks: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct AvgPriceResponse {
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    order_id: u64,
    price: String,
    orig_qty: String,
    executed_qty: String,
    status: String,
    side: String,
    /// Present on order reads, absent on placement.
    #[serde(default)]
    is_working: Option<bool>,
}

impl OrderResponse {
    fn into_order(self) -> GatewayResult<Order> {
        let status = OrderStatus::from_exchange(&self.status);
        let is_working = self
            .is_working
            .unwrap_or(matches!(status, OrderStatus::New | OrderStatus::PartiallyFilled));

        Ok(Order {
            id: OrderId(self.order_id),
            side: self
                .side
                .parse::<OrderSide>()
                .map_err(|e| GatewayError::Parse(e.to_string()))?,
            status,
            requested_quantity: Size::new(parse_decimal("origQty", &self.orig_qty)?),
            requested_price: Price::new(parse_decimal("price", &self.price)?),
            executed_quantity: Size::new(parse_decimal("executedQty", &self.executed_qty)?),
            is_working,
        })
    }
}

fn parse_decimal(field: &str, text: &str) -> GatewayResult<rust_decimal::Decimal> {
    text.parse()
        .map_err(|e| GatewayError::Parse(format!("{field} {text:?}: {e}")))
}

/// Kline rows are positional arrays: [openTime, open, high, low, close, ...].
fn parse_kline(row: &[serde_json::Value]) -> GatewayResult<Candle> {
    let open_time = row
        .first()
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| GatewayError::Parse("kline without open time".to_string()))?;
    let close = row
        .get(4)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| GatewayError::Parse(format!("kline {open_time} without close")))?;

    Ok(Candle::new(open_time, Price::new(parse_decimal("close", close)?)))
}

fn best_level(levels: &[(String, String)], side: &str) -> GatewayResult<Option<Price>> {
    levels
        .first()
        .map(|(price, _qty)| parse_decimal(side, price).map(Price::new))
        .transpose()
}

// ============================================================================
// BinanceRestGateway
// ============================================================================

/// Binance spot REST v3 client.
#[derive(Debug, Clone)]
pub struct BinanceRestGateway {
    base_url: String,
    credentials: Credentials,
    recv_window_ms: u64,
    client: Client,
}

impl BinanceRestGateway {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        recv_window_ms: u64,
    ) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let base_url: String = base_url.into();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms,
            client,
        })
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// Query string with timestamp, recvWindow and signature appended.
    fn signed_query(&self, params: &[(&str, String)]) -> GatewayResult<String> {
        let mut query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        query.push(format!("timestamp={}", Utc::now().timestamp_millis()));
        query.push(format!("recvWindow={}", self.recv_window_ms));
        let query = query.join("&");

        let signature = self.credentials.sign(&query)?;
        Ok(format!("{query}&signature={signature}"))
    }

    fn signed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("X-MBX-APIKEY", &self.credentials.api_key)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => {
                    warn!(status = %status, code = err.code, msg = %err.msg, "Exchange API error");
                    GatewayError::Api {
                        code: err.code,
                        message: err.msg,
                    }
                }
                Err(_) => GatewayError::Http(format!("{status}: {body}")),
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

impl ExchangeGateway for BinanceRestGateway {
    fn candles<'a>(
        &'a self,
        symbol: &'a str,
        interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, GatewayResult<Vec<Candle>>> {
        Box::pin(async move {
            let url = self.url(
                "/api/v3/klines",
                &format!("symbol={symbol}&interval={interval}&limit={limit}"),
            );
            let rows: Vec<Vec<serde_json::Value>> = self.send(self.client.get(&url)).await?;
            let candles = rows
                .iter()
                .map(|row| parse_kline(row))
                .collect::<GatewayResult<Vec<_>>>()?;
            debug!(symbol, interval, count = candles.len(), "Candles fetched");
            Ok(candles)
        })
    }

    fn book_top<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<BookTop>> {
        Box::pin(async move {
            let url = self.url("/api/v3/depth", &format!("symbol={symbol}&limit=5"));
            let depth: DepthResponse = self.send(self.client.get(&url)).await?;
            Ok(BookTop::new(
                best_level(&depth.asks, "ask")?,
                best_level(&depth.bids, "bid")?,
            ))
        })
    }

    fn daily_average_price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>> {
        Box::pin(async move {
            let url = self.url("/api/v3/avgPrice", &format!("symbol={symbol}"));
            let avg: AvgPriceResponse = self.send(self.client.get(&url)).await?;
            Ok(Price::new(parse_decimal("avgPrice", &avg.price)?))
        })
    }

    fn symbol_info<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<RawSymbolInfo>> {
        Box::pin(async move {
            let url = self.url("/api/v3/exchangeInfo", &format!("symbol={symbol}"));
            let info: RawExchangeInfo = self.send(self.client.get(&url)).await?;
            info.into_symbol(symbol)
                .ok_or_else(|| GatewayError::Parse(format!("exchangeInfo has no entry for {symbol}")))
        })
    }

    fn account_info(&self) -> BoxFuture<'_, GatewayResult<RawAccountInfo>> {
        Box::pin(async move {
            let query = self.signed_query(&[])?;
            let url = self.url("/api/v3/account", &query);
            self.send(self.signed(self.client.get(&url))).await
        })
    }

    fn place_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<Order>> {
        Box::pin(async move {
            let query = self.signed_query(&[
                ("symbol", request.symbol.clone()),
                ("side", request.side.as_str().to_string()),
                ("type", request.order_type.as_str().to_string()),
                ("timeInForce", request.time_in_force.as_str().to_string()),
                ("quantity", request.quantity.to_string()),
                ("price", request.price.to_string()),
                ("newOrderRespType", "RESULT".to_string()),
            ])?;
            let url = self.url("/api/v3/order", &query);
            let response: OrderResponse = self.send(self.signed(self.client.post(&url))).await?;
            response.into_order()
        })
    }

    fn get_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: OrderId,
    ) -> BoxFuture<'a, GatewayResult<Order>> {
        Box::pin(async move {
            let query = self.signed_query(&[
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ])?;
            let url = self.url("/api/v3/order", &query);
            let response: OrderResponse = self.send(self.signed(self.client.get(&url))).await?;
            response.into_order()
        })
    }
}
