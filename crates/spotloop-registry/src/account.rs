//! Account commission resolution.

use crate::error::{RegistryError, RegistryResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use spotloop_core::Commissions;
use tracing::info;

/// Raw signed account response. Only the fee fields are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccountInfo {
    /// Maker fee in basis points (10 = 0.1%).
    #[serde(default)]
    pub maker_commission: Option<i64>,
    /// Taker fee in basis points.
    #[serde(default)]
    pub taker_commission: Option<i64>,
    #[serde(default)]
    pub commission_rates: Option<RawCommissionRates>,
}

/// Fee fractions as decimal text ("0.00100000" = 0.1%).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommissionRates {
    #[serde(default)]
    pub maker: Option<String>,
    #[serde(default)]
    pub taker: Option<String>,
}

/// Converts account fee fields into percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommissionResolver;

impl CommissionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve maker and taker commission in percent.
    ///
    /// Uses the fractional `commissionRates` when present and falls back to
    /// the basis-point fields. A missing or zero rate is an error.
    pub fn resolve(&self, raw: &RawAccountInfo) -> RegistryResult<Commissions> {
        let rates = raw.commission_rates.as_ref();

        let maker = resolve_rate(
            "maker",
            rates.and_then(|r| r.maker.as_deref()),
            raw.maker_commission,
        )?;
        let taker = resolve_rate(
            "taker",
            rates.and_then(|r| r.taker.as_deref()),
            raw.taker_commission,
        )?;

        info!(maker_pct = %maker, taker_pct = %taker, "Commission resolved");
        Ok(Commissions::new(maker, taker))
    }
}

fn resolve_rate(side: &str, fraction: Option<&str>, bps: Option<i64>) -> RegistryResult<Decimal> {
    let percent = match (fraction, bps) {
        (Some(text), _) => {
            let value: Decimal = text.trim().parse().map_err(|e| {
                RegistryError::ParseError(format!("{side} commission {text:?}: {e}"))
            })?;
            value * Decimal::ONE_HUNDRED
        }
        (None, Some(bps)) => Decimal::from(bps) / Decimal::ONE_HUNDRED,
        (None, None) => {
            return Err(RegistryError::CommissionUnavailable(format!(
                "{side} commission missing"
            )))
        }
    };

    if percent.is_sign_negative() || percent.is_zero() {
        return Err(RegistryError::CommissionUnavailable(format!(
            "{side} commission is {percent}"
        )));
    }

    Ok(percent.normalize())
}
