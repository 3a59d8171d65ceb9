//! Executor error types.
//!
//! Every variant is fatal for the cycle that raised it.

use crate::gateway::GatewayError;
use spotloop_core::{OrderId, OrderSide, OrderStatus};
use spotloop_pricing::PricingError;
use spotloop_risk::RiskError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Market data missing or malformed mid-calculation.
    #[error("Data error: {0}")]
    Data(String),

    /// Placement answered with a status other than NEW.
    #[error("{side} order {order_id} not accepted: status {status}")]
    OrderRejected {
        side: OrderSide,
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Order stopped working without any fill.
    #[error("{side} order {order_id} resolved without fill: status {status}")]
    OrderResolutionFailed {
        side: OrderSide,
        order_id: OrderId,
        status: OrderStatus,
    },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The error marker itself could not be written.
    #[error("Error marker: {0}")]
    Marker(#[source] RiskError),
}

impl From<RiskError> for ExecutorError {
    fn from(e: RiskError) -> Self {
        Self::Data(e.to_string())
    }
}

impl From<PricingError> for ExecutorError {
    fn from(e: PricingError) -> Self {
        Self::Data(e.to_string())
    }
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
