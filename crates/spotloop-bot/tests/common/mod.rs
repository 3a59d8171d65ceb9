//! Shared fixtures for cycle tests.

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spotloop_bot::AppConfig;
use spotloop_core::{BookTop, Candle, Order, OrderId, OrderSide, OrderStatus, Price, Size};
use spotloop_executor::{DynGateway, ScriptedGateway};
use spotloop_registry::{RawAccountInfo, RawSymbolInfo};

pub const SYMBOL: &str = "TESTUSDT";

/// Two-decimal pair with a 5 USDT minimum notional.
pub fn symbol_info() -> RawSymbolInfo {
    serde_json::from_str(
        r#"{
            "symbol": "TESTUSDT",
            "status": "TRADING",
            "filters": [
                {"filterType": "PRICE_FILTER", "minPrice": "0.01000000", "tickSize": "0.01000000"},
                {"filterType": "LOT_SIZE", "minQty": "0.01000000", "stepSize": "0.01000000"},
                {"filterType": "MIN_NOTIONAL", "minNotional": "5.00000000"}
            ]
        }"#,
    )
    .unwrap()
}

/// 0.1% maker and taker.
pub fn account_info() -> RawAccountInfo {
    serde_json::from_str(r#"{"makerCommission": 10, "takerCommission": 10}"#).unwrap()
}

pub fn candles(closes: &[Decimal]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| Candle::new(1_700_000_000_000 + i as i64 * 60_000, Price::new(*c)))
        .collect()
}

/// Closes 100, 101, 99: no monotonic run, mean 100.
pub fn calm_candles() -> Vec<Candle> {
    candles(&[dec!(100), dec!(101), dec!(99)])
}

pub fn order(
    id: u64,
    side: OrderSide,
    status: OrderStatus,
    requested: Decimal,
    executed: Decimal,
    is_working: bool,
) -> Order {
    Order {
        id: OrderId(id),
        side,
        status,
        requested_quantity: Size::new(requested),
        requested_price: Price::new(dec!(100)),
        executed_quantity: Size::new(executed),
        is_working,
    }
}

/// Config with a 1000 USDT budget, 3-candle windows and no polling delay.
pub fn config(marker_path: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.error_marker_path = marker_path.display().to_string();
    config.trading.symbol = SYMBOL.to_string();
    config.trading.buy_budget = dec!(1000);
    config.trading.profit_percent = dec!(0.3);
    config.trading.candle_window_size = 3;
    config.trading.volatility_window_size = 3;
    config.trading.poll_interval_ms = 0;
    config
}

/// Gateway scripted with metadata and a calm market below the daily average.
pub fn gateway() -> Arc<ScriptedGateway> {
    let gw = Arc::new(ScriptedGateway::new());
    gw.push_symbol_info(symbol_info())
        .push_account_info(account_info())
        .push_candles(calm_candles())
        .push_book_top(BookTop::empty())
        .push_daily_average(Price::new(dec!(110)));
    gw
}

/// Script one buy that fills at once and one sell that fills at once.
pub fn script_simple_cycle(gw: &ScriptedGateway, first_id: u64) {
    gw.push_placement(order(first_id, OrderSide::Buy, OrderStatus::New, dec!(10), dec!(0), true))
        .push_order_read(order(first_id, OrderSide::Buy, OrderStatus::Filled, dec!(10), dec!(10), false))
        .push_placement(order(first_id + 1, OrderSide::Sell, OrderStatus::New, dec!(10), dec!(0), true))
        .push_order_read(order(first_id + 1, OrderSide::Sell, OrderStatus::Filled, dec!(10), dec!(10), false));
}

pub fn as_dyn(gw: &Arc<ScriptedGateway>) -> DynGateway {
    gw.clone()
}
