//! Application configuration.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotloop_executor::CycleSettings;
use std::time::Duration;

/// Trading parameters for the single configured pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Trading pair (e.g., "BTCUSDT").
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Quote-asset amount spent per cycle.
    #[serde(default = "default_buy_budget")]
    pub buy_budget: Decimal,
    /// Profit margin added on top of both legs' fees (percent).
    #[serde(default = "default_profit_percent")]
    pub profit_percent: Decimal,
    /// Kline interval (e.g., "1m").
    #[serde(default = "default_candle_interval")]
    pub candle_interval: String,
    /// Candles averaged for the buy price. Default: 20.
    #[serde(default = "default_candle_window_size")]
    pub candle_window_size: usize,
    /// Candles inspected by the volatility gate. Default: 4.
    #[serde(default = "default_volatility_window_size")]
    pub volatility_window_size: usize,
    /// Order polling interval and gate back-off (ms). Default: 2000.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Resell the post-fee holding (fee charged in the base asset).
    #[serde(default)]
    pub deduct_commission_from_sell: bool,
    /// Stop after this many completed cycles. 0 = run indefinitely.
    #[serde(default)]
    pub max_cycles: u64,
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_buy_budget() -> Decimal {
    Decimal::from(15)
}

fn default_profit_percent() -> Decimal {
    Decimal::new(3, 1) // 0.3%
}

fn default_candle_interval() -> String {
    "1m".to_string()
}

fn default_candle_window_size() -> usize {
    20
}

fn default_volatility_window_size() -> usize {
    4
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            buy_budget: default_buy_budget(),
            profit_percent: default_profit_percent(),
            candle_interval: default_candle_interval(),
            candle_window_size: default_candle_window_size(),
            volatility_window_size: default_volatility_window_size(),
            poll_interval_ms: default_poll_interval_ms(),
            deduct_commission_from_sell: false,
            max_cycles: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// JSON output instead of pretty.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange REST base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// recvWindow for signed requests (ms).
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Fatal error marker file.
    #[serde(default = "default_error_marker_path")]
    pub error_marker_path: String,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_rest_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_recv_window_ms() -> u64 {
    5000
}

fn default_error_marker_path() -> String {
    "logs/error.log".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            recv_window_ms: default_recv_window_ms(),
            error_marker_path: default_error_marker_path(),
            trading: TradingConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Reject values no cycle could run with.
    pub fn validate(&self) -> AppResult<()> {
        let t = &self.trading;

        if t.symbol.trim().is_empty() {
            return Err(AppError::Config("trading.symbol must not be empty".to_string()));
        }
        if t.buy_budget <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "trading.buy_budget must be positive, got {}",
                t.buy_budget
            )));
        }
        if t.profit_percent < Decimal::ZERO {
            return Err(AppError::Config(format!(
                "trading.profit_percent must not be negative, got {}",
                t.profit_percent
            )));
        }
        if t.candle_window_size == 0 || t.volatility_window_size == 0 {
            return Err(AppError::Config(
                "trading.candle_window_size and trading.volatility_window_size must be at least 1"
                    .to_string(),
            ));
        }
        if t.candle_interval.trim().is_empty() {
            return Err(AppError::Config(
                "trading.candle_interval must not be empty".to_string(),
            ));
        }
        if self.error_marker_path.trim().is_empty() {
            return Err(AppError::Config("error_marker_path must not be empty".to_string()));
        }

        Ok(())
    }

    /// Parameters handed to the lifecycle manager.
    pub fn cycle_settings(&self) -> CycleSettings {
        let t = &self.trading;
        CycleSettings {
            symbol: t.symbol.to_ascii_uppercase(),
            buy_budget: t.buy_budget,
            profit_percent: t.profit_percent,
            candle_interval: t.candle_interval.clone(),
            candle_window_size: t.candle_window_size,
            volatility_window_size: t.volatility_window_size,
            poll_interval: Duration::from_millis(t.poll_interval_ms),
            deduct_commission_from_sell: t.deduct_commission_from_sell,
        }
    }
}
