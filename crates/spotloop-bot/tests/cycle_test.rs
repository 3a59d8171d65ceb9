//! End-to-end trade cycles against the scripted gateway.

mod common;

use common::*;
use rust_decimal_macros::dec;
use spotloop_bot::{AppError, Application};
use spotloop_core::{BookTop, OrderSide, OrderStatus, Price, Size};
use spotloop_executor::{ExecutorError, Operation, ScriptedGateway};
use spotloop_risk::ErrorMarker;
use std::sync::Arc;

#[tokio::test]
async fn test_completed_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("logs").join("error.log");
    let gw = gateway();
    script_simple_cycle(&gw, 1);

    let app = Application::new(config(&marker_path)).unwrap().with_max_cycles(1);
    let summary = app.run(as_dyn(&gw)).await.unwrap();

    assert_eq!(summary.cycles_completed, 1);
    let report = summary.last_report.unwrap();
    assert_eq!(report.ask_price.to_string(), "100.00");
    assert_eq!(report.bid_price.to_string(), "100.50");
    assert_eq!(report.sold, Size::new(dec!(10)));

    let placed = gw.placed_orders();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].side, OrderSide::Buy);
    assert_eq!(placed[0].symbol, SYMBOL);
    assert_eq!(placed[0].price.to_string(), "100.00");
    assert_eq!(placed[0].quantity.to_string(), "10.00");
    assert_eq!(placed[1].side, OrderSide::Sell);
    assert_eq!(placed[1].price.to_string(), "100.50");
    assert_eq!(placed[1].quantity.to_string(), "10.00");

    assert_eq!(gw.calls(Operation::SymbolInfo), 1);
    assert_eq!(gw.calls(Operation::AccountInfo), 1);
    assert!(!ErrorMarker::new(&marker_path).has_unresolved_error());
}

#[tokio::test]
async fn test_sell_partial_fill_resubmits_remainder() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("error.log");
    let gw = gateway();

    gw.push_placement(order(1, OrderSide::Buy, OrderStatus::New, dec!(10), dec!(0), true))
        .push_order_read(order(1, OrderSide::Buy, OrderStatus::Filled, dec!(10), dec!(10), false))
        // First sell: 3 of 10 executed, then stops working.
        .push_placement(order(2, OrderSide::Sell, OrderStatus::New, dec!(10), dec!(0), true))
        .push_order_read(order(2, OrderSide::Sell, OrderStatus::PartiallyFilled, dec!(10), dec!(3), true))
        .push_order_read(order(2, OrderSide::Sell, OrderStatus::PartiallyFilled, dec!(10), dec!(3), false))
        // Remainder fills.
        .push_placement(order(3, OrderSide::Sell, OrderStatus::New, dec!(7), dec!(0), true))
        .push_order_read(order(3, OrderSide::Sell, OrderStatus::Filled, dec!(7), dec!(7), false));

    let app = Application::new(config(&marker_path)).unwrap().with_max_cycles(1);
    let summary = app.run(as_dyn(&gw)).await.unwrap();

    let placed = gw.placed_orders();
    assert_eq!(placed.len(), 3);
    assert_eq!(placed[2].side, OrderSide::Sell);
    assert_eq!(placed[2].quantity, Size::new(dec!(7)));
    assert_eq!(placed[2].price, placed[1].price);

    let report = summary.last_report.unwrap();
    assert_eq!(report.sell_orders, 2);
    assert_eq!(report.sold, Size::new(dec!(10)));
    assert_eq!(gw.calls(Operation::GetOrder), 4);
    assert!(!ErrorMarker::new(&marker_path).has_unresolved_error());
}

#[tokio::test]
async fn test_buy_partial_fill_sells_executed_quantity() {
    let dir = tempfile::tempdir().unwrap();
    let gw = gateway();

    gw.push_placement(order(1, OrderSide::Buy, OrderStatus::New, dec!(10), dec!(0), true))
        .push_order_read(order(1, OrderSide::Buy, OrderStatus::PartiallyFilled, dec!(10), dec!(4.5), false))
        .push_placement(order(2, OrderSide::Sell, OrderStatus::New, dec!(4.5), dec!(0), true))
        .push_order_read(order(2, OrderSide::Sell, OrderStatus::Filled, dec!(4.5), dec!(4.5), false));

    let app = Application::new(config(&dir.path().join("error.log")))
        .unwrap()
        .with_max_cycles(1);
    let summary = app.run(as_dyn(&gw)).await.unwrap();

    let placed = gw.placed_orders();
    assert_eq!(placed[1].quantity.to_string(), "4.50");
    assert_eq!(summary.last_report.unwrap().bought, Size::new(dec!(4.5)));
}

#[tokio::test]
async fn test_buy_rejection_writes_marker_and_skips_sell() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("logs").join("error.log");
    let gw = gateway();
    gw.push_placement(order(1, OrderSide::Buy, OrderStatus::Rejected, dec!(10), dec!(0), false));

    let app = Application::new(config(&marker_path)).unwrap();
    let err = app.run(as_dyn(&gw)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Cycle(ExecutorError::OrderRejected {
            side: OrderSide::Buy,
            status: OrderStatus::Rejected,
            ..
        })
    ));
    assert_eq!(gw.placed_orders().len(), 1);
    assert_eq!(gw.calls(Operation::GetOrder), 0);

    let marker = ErrorMarker::new(&marker_path);
    assert!(marker.has_unresolved_error());
    assert!(marker.reason().unwrap().contains("REJECTED"));

    // Next start is refused until the marker is cleared.
    assert!(matches!(
        Application::new(config(&marker_path)),
        Err(AppError::UnresolvedError { .. })
    ));
    marker.clear().unwrap();
    assert!(Application::new(config(&marker_path)).is_ok());
}

#[tokio::test]
async fn test_daily_average_gate_logs_once_per_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let gw = Arc::new(ScriptedGateway::new());

    // Mean close 105 against a daily average of 100, three times.
    gw.push_symbol_info(symbol_info())
        .push_account_info(account_info())
        .push_candles(candles(&[dec!(105), dec!(106), dec!(104)]))
        .push_book_top(BookTop::empty())
        .push_daily_average(Price::new(dec!(100)))
        .push_daily_average(Price::new(dec!(100)))
        .push_daily_average(Price::new(dec!(100)))
        .push_daily_average(Price::new(dec!(200)));
    script_simple_cycle(&gw, 1);

    let app = Application::new(config(&dir.path().join("error.log")))
        .unwrap()
        .with_max_cycles(1);
    let summary = app.run(as_dyn(&gw)).await.unwrap();

    assert_eq!(gw.calls(Operation::DailyAveragePrice), 4);
    assert_eq!(summary.gate_log_lines, 1);

    let report = summary.last_report.unwrap();
    assert_eq!(report.gate_waits, 3);
    assert_eq!(report.ask_price.to_string(), "105.00");

    // 1000 / 105 = 9.5238.. truncated to 9.52, bumped one step.
    let placed = gw.placed_orders();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].quantity.to_string(), "9.53");
}

#[tokio::test]
async fn test_marker_refuses_startup() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("error.log");
    std::fs::write(&marker_path, "2024-01-01T00:00:00+00:00 TESTUSDT: boom\n").unwrap();

    match Application::new(config(&marker_path)) {
        Err(AppError::UnresolvedError { reason, .. }) => assert!(reason.contains("boom")),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("started over an unresolved error"),
    }

    std::fs::write(&marker_path, " \n").unwrap();
    assert!(Application::new(config(&marker_path)).is_ok());
}

#[tokio::test]
async fn test_runs_configured_number_of_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let gw = gateway();
    script_simple_cycle(&gw, 1);
    script_simple_cycle(&gw, 3);

    let mut cfg = config(&dir.path().join("error.log"));
    cfg.trading.max_cycles = 2;

    let summary = Application::new(cfg).unwrap().run(as_dyn(&gw)).await.unwrap();

    assert_eq!(summary.cycles_completed, 2);
    assert_eq!(gw.placed_orders().len(), 4);
    // Constraints and commissions are resolved once per run.
    assert_eq!(gw.calls(Operation::SymbolInfo), 1);
    assert_eq!(gw.calls(Operation::AccountInfo), 1);
}

#[tokio::test]
async fn test_unresolvable_symbol_is_fatal_without_marker() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("error.log");
    let gw = Arc::new(ScriptedGateway::new());

    let mut info = symbol_info();
    info.filters.truncate(2);
    gw.push_symbol_info(info).push_account_info(account_info());

    let err = Application::new(config(&marker_path))
        .unwrap()
        .run(as_dyn(&gw))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConfigResolution(_)));
    assert!(gw.placed_orders().is_empty());
    assert!(!ErrorMarker::new(&marker_path).has_unresolved_error());
}

#[tokio::test]
async fn test_deduct_commission_from_sell() {
    let dir = tempfile::tempdir().unwrap();
    let gw = gateway();
    script_simple_cycle(&gw, 1);

    let mut cfg = config(&dir.path().join("error.log"));
    cfg.trading.deduct_commission_from_sell = true;

    Application::new(cfg)
        .unwrap()
        .with_max_cycles(1)
        .run(as_dyn(&gw))
        .await
        .unwrap();

    // 10 - 0.1% = 9.99
    assert_eq!(gw.placed_orders()[1].quantity.to_string(), "9.99");
}
