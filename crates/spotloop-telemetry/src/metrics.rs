//! Prometheus metrics for the spotloop bot.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error caught on first use.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram, CounterVec, Histogram};

/// Trade cycles finished.
/// Labels: outcome (completed/failed)
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "spotloop_cycles_total",
        "Total trade cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Gate blocks (every firing, not only logged ones).
/// Labels: gate (volatility/daily_average)
pub static GATE_BLOCKED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "spotloop_gate_blocked_total",
        "Total pre-trade gate blocks",
        &["gate"]
    )
    .unwrap()
});

/// Orders accepted by the exchange.
pub static ORDERS_PLACED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "spotloop_orders_placed_total",
        "Total orders placed",
        &["side"]
    )
    .unwrap()
});

/// Orders that stopped working partially filled.
pub static PARTIAL_FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "spotloop_partial_fills_total",
        "Total partial fills",
        &["side"]
    )
    .unwrap()
});

/// Wall time of completed cycles, from first gate pass to final fill.
pub static CYCLE_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "spotloop_cycle_duration_seconds",
        "Duration of completed trade cycles in seconds",
        vec![1.0, 10.0, 60.0, 300.0, 900.0, 3600.0, 14400.0, 86400.0]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a cycle that reached Completed.
    pub fn cycle_completed(duration_secs: f64) {
        CYCLES_TOTAL.with_label_values(&["completed"]).inc();
        CYCLE_DURATION_SECONDS.observe(duration_secs);
    }

    /// Record a cycle that reached Failed.
    pub fn cycle_failed() {
        CYCLES_TOTAL.with_label_values(&["failed"]).inc();
    }

    pub fn gate_blocked(gate: &str) {
        GATE_BLOCKED_TOTAL.with_label_values(&[gate]).inc();
    }

    pub fn order_placed(side: &str) {
        ORDERS_PLACED_TOTAL.with_label_values(&[side]).inc();
    }

    pub fn partial_fill(side: &str) {
        PARTIAL_FILLS_TOTAL.with_label_values(&[side]).inc();
    }
}
