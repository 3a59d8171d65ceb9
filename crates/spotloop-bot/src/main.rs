//! spotloop - Entry Point
//!
//! Buys a fixed budget of one pair and resells it at a markup, cycle after
//! cycle, until a fatal error or an external stop.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use spotloop_bot::{AppConfig, Application};
use spotloop_executor::{BinanceRestGateway, Credentials, DynGateway};
use spotloop_risk::ErrorMarker;
use tracing::info;

/// Single-pair buy-then-resell spot bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SPOTLOOP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Clear the fatal error marker and exit
    #[arg(long)]
    clear_error: bool,

    /// Stop after one completed cycle
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > SPOTLOOP_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("SPOTLOOP_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = AppConfig::from_file(&config_path)?;
    spotloop_telemetry::init_logging(&config.telemetry.log_level, config.telemetry.json)?;

    info!(
        config_path = %config_path,
        symbol = %config.trading.symbol,
        "Starting spotloop v{}",
        env!("CARGO_PKG_VERSION")
    );

    if args.clear_error {
        ErrorMarker::new(&config.error_marker_path).clear()?;
        return Ok(());
    }

    let mut app = Application::new(config)?;
    if args.once {
        app = app.with_max_cycles(1);
    }

    let credentials = Credentials::from_env()?;
    let gateway: DynGateway = Arc::new(BinanceRestGateway::new(
        app.config().rest_url.clone(),
        credentials,
        app.config().recv_window_ms,
    )?);

    tokio::select! {
        result = app.run(gateway) => {
            let summary = result?;
            info!(cycles = summary.cycles_completed, "Run finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
