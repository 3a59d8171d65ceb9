//! Main application logic.
//!
//! Startup checks the fatal error marker, resolves the symbol's constraints
//! and the account's commissions once, then runs trade cycles back to back.
//! A failed cycle ends the run: the marker is already written and nothing
//! is retried until an operator clears it.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use spotloop_core::{Commissions, SymbolConstraints};
use spotloop_executor::{CycleReport, DynGateway, OrderLifecycleManager};
use spotloop_registry::{CommissionResolver, SymbolConstraintResolver};
use spotloop_risk::ErrorMarker;
use tracing::{info, warn};

/// Outcome of a bounded run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub cycles_completed: u64,
    pub last_report: Option<CycleReport>,
    /// Deduplicated gate messages emitted across the run.
    pub gate_log_lines: u64,
}

/// Main application.
pub struct Application {
    config: AppConfig,
    marker: ErrorMarker,
    max_cycles: u64,
}

impl Application {
    /// Validate the configuration and refuse to start over an unresolved
    /// fatal error.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let marker = ErrorMarker::new(&config.error_marker_path);
        if marker.has_unresolved_error() {
            let reason = marker.reason().unwrap_or_default();
            warn!(path = %config.error_marker_path, reason = %reason, "Unresolved fatal error, refusing to start");
            return Err(AppError::UnresolvedError {
                path: config.error_marker_path.clone(),
                reason,
            });
        }

        let max_cycles = config.trading.max_cycles;
        Ok(Self {
            config,
            marker,
            max_cycles,
        })
    }

    /// Stop after `max_cycles` completed cycles (0 = unbounded).
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve symbol constraints and commissions from exchange metadata.
    pub async fn resolve(
        &self,
        gateway: &DynGateway,
    ) -> AppResult<(SymbolConstraints, Commissions)> {
        let symbol = self.config.trading.symbol.to_ascii_uppercase();

        let raw_symbol = gateway.symbol_info(&symbol).await?;
        let constraints = SymbolConstraintResolver::new(symbol.as_str()).resolve(&raw_symbol)?;

        let raw_account = gateway.account_info().await?;
        let commissions = CommissionResolver::new().resolve(&raw_account)?;

        Ok((constraints, commissions))
    }

    /// Resolve once, then run cycles until `max_cycles` or the first failure.
    pub async fn run(&self, gateway: DynGateway) -> AppResult<RunSummary> {
        let (constraints, commissions) = self.resolve(&gateway).await?;

        let settings = self.config.cycle_settings();
        info!(
            symbol = %settings.symbol,
            buy_budget = %settings.buy_budget,
            profit_pct = %settings.profit_percent,
            max_cycles = self.max_cycles,
            "Starting trade cycles"
        );

        let mut manager = OrderLifecycleManager::new(
            gateway,
            settings,
            constraints,
            commissions,
            self.marker.clone(),
        );
        let mut summary = RunSummary::default();

        loop {
            let report = manager.run_cycle().await?;

            summary.cycles_completed += 1;
            summary.last_report = Some(report);
            summary.gate_log_lines = manager.cycle_log().emitted_total();

            if self.max_cycles > 0 && summary.cycles_completed >= self.max_cycles {
                info!(cycles = summary.cycles_completed, "Cycle limit reached");
                break;
            }
        }

        Ok(summary)
    }
}
