//! Order execution for spotloop.
//!
//! # Key Components
//!
//! - [`ExchangeGateway`]: the exchange operations a trade cycle consumes
//! - [`BinanceRestGateway`]: Binance spot REST implementation
//! - [`ScriptedGateway`]: deterministic fake driven by scripted responses
//! - [`OrderLifecycleManager`]: the trade cycle state machine
//!
//! # Cycle (in `OrderLifecycleManager::run_cycle`)
//!
//! 1. GatingMarket: volatility and daily-average gates, back off while blocked
//! 2. PlacingAsk -> AwaitingAskResolution: limit buy, poll until not working
//! 3. PlacingBid -> AwaitingBidResolution: limit sell, resubmit the remainder
//!    after each partial fill at the same price
//! 4. Completed, or Failed with the error marker written

pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod rest_gateway;
pub mod scripted;

pub use error::{ExecutorError, ExecutorResult};
pub use gateway::{BoxFuture, DynGateway, ExchangeGateway, GatewayError, GatewayResult};
pub use lifecycle::{CycleReport, CycleSettings, OrderLifecycleManager, TradeCycleState};
pub use rest_gateway::{BinanceRestGateway, Credentials};
pub use scripted::{Operation, ScriptedGateway};
