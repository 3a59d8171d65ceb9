//! Trade cycle state machine.
//!
//! One cycle buys the configured budget and resells what was bought:
//!
//! ```text
//! Idle -> GatingMarket -> PlacingAsk -> AwaitingAskResolution
//!      -> PlacingBid -> AwaitingBidResolution -> Completed -> Idle
//!           ^                    | partial fill
//!           +--------------------+
//! ```
//!
//! A blocked gate sends the cycle back to Idle for one poll interval and is
//! not an error. Any error moves the cycle to Failed and writes the error
//! marker before it is returned; nothing is retried.
//!
//! Order state is never edited locally: every decision is taken on a fresh
//! read from the gateway. The sell leg is only placed once the buy leg has
//! stopped working with a fill.

use std::fmt;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use spotloop_core::{
    Commissions, Order, OrderId, OrderRequest, OrderSide, OrderStatus, Price, Size,
    SymbolConstraints,
};
use spotloop_pricing::{PriceCalculator, QuantityCalculator, Quote};
use spotloop_risk::{DailyAverageGate, ErrorMarker, GateResult, VolatilityFilter};
use spotloop_telemetry::{CycleLog, Metrics};
use tracing::{debug, error, info, warn, Level};

use crate::error::{ExecutorError, ExecutorResult};
use crate::gateway::DynGateway;

const VOLATILITY_MARK: &str = "volatility";
const DAILY_AVERAGE_MARK: &str = "daily_average";

/// Trade cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeCycleState {
    Idle,
    GatingMarket,
    PlacingAsk,
    AwaitingAskResolution,
    PlacingBid,
    AwaitingBidResolution,
    Completed,
    Failed,
}

impl TradeCycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::GatingMarket => "gating_market",
            Self::PlacingAsk => "placing_ask",
            Self::AwaitingAskResolution => "awaiting_ask_resolution",
            Self::PlacingBid => "placing_bid",
            Self::AwaitingBidResolution => "awaiting_bid_resolution",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TradeCycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-cycle trading parameters.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub symbol: String,
    /// Quote-asset amount spent per cycle.
    pub buy_budget: Decimal,
    pub profit_percent: Decimal,
    pub candle_interval: String,
    /// Candles averaged for the ask price.
    pub candle_window_size: usize,
    /// Candles inspected by the volatility gate.
    pub volatility_window_size: usize,
    /// Order polling interval, also the gate back-off.
    pub poll_interval: Duration,
    /// Resell the post-fee holding instead of the executed quantity.
    pub deduct_commission_from_sell: bool,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            buy_budget: Decimal::from(15),
            profit_percent: Decimal::new(3, 1),
            candle_interval: "1m".to_string(),
            candle_window_size: 20,
            volatility_window_size: 4,
            poll_interval: Duration::from_millis(2000),
            deduct_commission_from_sell: false,
        }
    }
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub buy_order_id: OrderId,
    pub ask_price: Price,
    pub bid_price: Price,
    pub bought: Size,
    pub sold: Size,
    /// Sell orders placed (1 + partial-fill resubmissions).
    pub sell_orders: u32,
    /// Gate back-offs before the buy leg.
    pub gate_waits: u32,
}

/// Prices and buy quantity that passed every gate.
struct MarketDecision {
    quote: Quote,
    quantity: Size,
}

/// Drives trade cycles against an exchange gateway.
///
/// Owns the per-cycle log deduper; only one cycle runs at a time because
/// `run_cycle` takes `&mut self`.
pub struct OrderLifecycleManager {
    gateway: DynGateway,
    settings: CycleSettings,
    constraints: SymbolConstraints,
    prices: PriceCalculator,
    quantities: QuantityCalculator,
    volatility: VolatilityFilter,
    daily_average: DailyAverageGate,
    marker: ErrorMarker,
    log: CycleLog,
    state: TradeCycleState,
}

impl OrderLifecycleManager {
    pub fn new(
        gateway: DynGateway,
        settings: CycleSettings,
        constraints: SymbolConstraints,
        commissions: Commissions,
        marker: ErrorMarker,
    ) -> Self {
        let prices = PriceCalculator::new(commissions, settings.profit_percent);
        let quantities = QuantityCalculator::new(constraints.clone(), commissions.worst_percent());
        let volatility = VolatilityFilter::new(settings.volatility_window_size);

        Self {
            gateway,
            settings,
            constraints,
            prices,
            quantities,
            volatility,
            daily_average: DailyAverageGate::new(),
            marker,
            log: CycleLog::new(),
            state: TradeCycleState::Idle,
        }
    }

    pub fn state(&self) -> TradeCycleState {
        self.state
    }

    pub fn cycle_log(&self) -> &CycleLog {
        &self.log
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Run one full cycle.
    ///
    /// On success the manager is back in Idle. On error it stays in Failed
    /// and the error marker holds the reason.
    pub async fn run_cycle(&mut self) -> ExecutorResult<CycleReport> {
        let started = Instant::now();

        match self.execute().await {
            Ok(report) => {
                self.transition(TradeCycleState::Completed);
                info!(
                    symbol = %self.settings.symbol,
                    buy_order_id = %report.buy_order_id,
                    ask = %report.ask_price,
                    bid = %report.bid_price,
                    bought = %report.bought,
                    sold = %report.sold,
                    sell_orders = report.sell_orders,
                    gate_waits = report.gate_waits,
                    "Cycle completed"
                );
                Metrics::cycle_completed(started.elapsed().as_secs_f64());
                self.log.clear();
                self.transition(TradeCycleState::Idle);
                Ok(report)
            }
            Err(e) => {
                self.transition(TradeCycleState::Failed);
                error!(symbol = %self.settings.symbol, error = %e, "Cycle failed");
                Metrics::cycle_failed();
                self.log.clear();

                self.marker
                    .record(&format!("{}: {}", self.settings.symbol, e))
                    .map_err(ExecutorError::Marker)?;
                Err(e)
            }
        }
    }

    async fn execute(&mut self) -> ExecutorResult<CycleReport> {
        let mut gate_waits = 0u32;

        let decision = loop {
            self.transition(TradeCycleState::GatingMarket);
            if let Some(decision) = self.evaluate_market().await? {
                break decision;
            }
            gate_waits += 1;
            self.transition(TradeCycleState::Idle);
            tokio::time::sleep(self.settings.poll_interval).await;
        };

        let ask_price = self.constraints.price(decision.quote.ask);
        let bid_price = self.constraints.price(decision.quote.bid);

        // Buy leg
        self.transition(TradeCycleState::PlacingAsk);
        let buy = self
            .place(OrderSide::Buy, decision.quantity, ask_price)
            .await?;
        self.transition(TradeCycleState::AwaitingAskResolution);
        let buy = self.await_resolution(&buy).await?;

        if !buy.executed_quantity.is_positive() {
            return Err(ExecutorError::OrderResolutionFailed {
                side: OrderSide::Buy,
                order_id: buy.id,
                status: buy.status,
            });
        }
        if buy.status == OrderStatus::PartiallyFilled {
            Metrics::partial_fill(&OrderSide::Buy.to_string());
            info!(
                order_id = %buy.id,
                executed = %buy.executed_quantity,
                requested = %buy.requested_quantity,
                "Buy order partially filled, selling executed quantity"
            );
        }

        // Sell leg
        let mut remaining = if self.settings.deduct_commission_from_sell {
            self.quantities.bid_quantity(buy.executed_quantity)?
        } else {
            self.constraints.quantity(buy.executed_quantity)
        };
        let mut sold = Size::ZERO;
        let mut sell_orders = 0u32;

        loop {
            self.transition(TradeCycleState::PlacingBid);
            let sell = self.place(OrderSide::Sell, remaining, bid_price).await?;
            sell_orders += 1;

            self.transition(TradeCycleState::AwaitingBidResolution);
            let sell = self.await_resolution(&sell).await?;
            sold = sold + sell.executed_quantity;

            if sell.status == OrderStatus::Filled {
                break;
            }

            // Partially filled: resubmit the remainder at the same price.
            remaining = sell.remaining_quantity();
            if !remaining.is_positive() {
                return Err(ExecutorError::OrderResolutionFailed {
                    side: OrderSide::Sell,
                    order_id: sell.id,
                    status: sell.status,
                });
            }
            Metrics::partial_fill(&OrderSide::Sell.to_string());
            info!(
                order_id = %sell.id,
                executed = %sell.executed_quantity,
                remaining = %remaining,
                price = %bid_price,
                "Sell order partially filled, resubmitting remainder"
            );
        }

        Ok(CycleReport {
            buy_order_id: buy.id,
            ask_price,
            bid_price,
            bought: buy.executed_quantity,
            sold,
            sell_orders,
            gate_waits,
        })
    }

    /// Fetch market data and run the gates.
    ///
    /// Returns `None` when a gate blocks.
    async fn evaluate_market(&mut self) -> ExecutorResult<Option<MarketDecision>> {
        let symbol = self.settings.symbol.as_str();
        let limit = self
            .settings
            .candle_window_size
            .max(self.settings.volatility_window_size);

        let candles = self
            .gateway
            .candles(symbol, &self.settings.candle_interval, limit)
            .await?;

        if let GateResult::Block(reason) = self.volatility.check(&candles)? {
            Metrics::gate_blocked(VOLATILITY_MARK);
            self.log.send(
                Level::INFO,
                VOLATILITY_MARK,
                &format!("Volatility gate blocked: {reason}"),
            );
            return Ok(None);
        }

        let book = self.gateway.book_top(symbol).await?;
        let window = &candles[candles.len().saturating_sub(self.settings.candle_window_size)..];
        let quote = self.prices.quote(&book, window)?;

        let daily_average = self.gateway.daily_average_price(symbol).await?;
        if let GateResult::Block(reason) = self.daily_average.check(quote.ask, daily_average) {
            Metrics::gate_blocked(DAILY_AVERAGE_MARK);
            self.log.send(
                Level::INFO,
                DAILY_AVERAGE_MARK,
                &format!("Daily average gate blocked: {reason}"),
            );
            return Ok(None);
        }

        let quantity = self
            .quantities
            .ask_quantity(self.settings.buy_budget, quote.ask, quote.bid)?;

        debug!(
            ask = %quote.ask,
            bid = %quote.bid,
            daily_average = %daily_average,
            quantity = %quantity,
            "Market gates passed"
        );

        Ok(Some(MarketDecision { quote, quantity }))
    }

    /// Submit a limit order; anything but NEW at placement is a rejection.
    async fn place(&self, side: OrderSide, quantity: Size, price: Price) -> ExecutorResult<Order> {
        let request = OrderRequest::limit(self.settings.symbol.clone(), side, quantity, price);
        info!(
            symbol = %request.symbol,
            side = %side,
            quantity = %quantity,
            price = %price,
            "Placing order"
        );

        let order = self.gateway.place_order(request).await?;
        if order.status != OrderStatus::New {
            warn!(order_id = %order.id, side = %side, status = %order.status, "Order not accepted");
            return Err(ExecutorError::OrderRejected {
                side,
                order_id: order.id,
                status: order.status,
            });
        }

        Metrics::order_placed(&side.to_string());
        Ok(order)
    }

    /// Poll until the order stops working; it must end with a fill.
    async fn await_resolution(&self, placed: &Order) -> ExecutorResult<Order> {
        let mut polls = 0u32;

        let order = loop {
            tokio::time::sleep(self.settings.poll_interval).await;
            let order = self
                .gateway
                .get_order(&self.settings.symbol, placed.id)
                .await?;
            polls += 1;
            if !order.is_working {
                break order;
            }
        };

        debug!(
            order_id = %order.id,
            side = %order.side,
            status = %order.status,
            executed = %order.executed_quantity,
            polls,
            "Order stopped working"
        );

        if !order.status.has_fills() {
            return Err(ExecutorError::OrderResolutionFailed {
                side: placed.side,
                order_id: placed.id,
                status: order.status,
            });
        }

        Ok(order)
    }

    fn transition(&mut self, next: TradeCycleState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Cycle state");
            self.state = next;
        }
    }
}
