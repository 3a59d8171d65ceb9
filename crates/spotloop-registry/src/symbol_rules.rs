//! Symbol constraint resolution.
//!
//! Derives price/quantity precision and minimum-order thresholds from the
//! filter set the exchange publishes for a symbol.

use crate::error::{RegistryError, RegistryResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use spotloop_core::{Size, SymbolConstraints};
use tracing::{debug, info};

/// Raw exchangeInfo response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<RawSymbolInfo>,
}

impl RawExchangeInfo {
    /// Take the entry for `symbol` out of the response.
    pub fn into_symbol(self, symbol: &str) -> Option<RawSymbolInfo> {
        self.symbols
            .into_iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// Raw symbol entry from exchangeInfo.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSymbolInfo {
    pub symbol: String,
    /// Trading status (e.g. "TRADING", "BREAK").
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub filters: Vec<RawFilter>,
}

/// One entry of a symbol's filter set.
///
/// Numeric fields are kept as the exchange's decimal text; their digit
/// count carries the precision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "filterType")]
pub enum RawFilter {
    #[serde(rename = "PRICE_FILTER")]
    PriceFilter {
        #[serde(rename = "tickSize", default)]
        tick_size: Option<String>,
    },
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "stepSize", default)]
        step_size: Option<String>,
        #[serde(rename = "minQty", default)]
        min_qty: Option<String>,
    },
    #[serde(rename = "MIN_NOTIONAL")]
    MinNotional {
        #[serde(rename = "minNotional", default)]
        min_notional: Option<String>,
    },
    /// Newer replacement of MIN_NOTIONAL on some symbols.
    #[serde(rename = "NOTIONAL")]
    Notional {
        #[serde(rename = "minNotional", default)]
        min_notional: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Count significant decimal places in a tick/step size.
///
/// Takes the digits after the decimal point and strips trailing zeros:
/// - "0.01000000" -> 2
/// - "0.00001000" -> 5
/// - "1.00000000" -> 0
/// - "0.5" -> 1
pub fn decimal_places(text: &str) -> RegistryResult<u32> {
    let text = text.trim();
    let value: Decimal = text
        .parse()
        .map_err(|e| RegistryError::ParseError(format!("{text:?}: {e}")))?;

    if value.is_sign_negative() || value.is_zero() {
        return Err(RegistryError::ParseError(format!(
            "{text:?}: increment must be positive"
        )));
    }

    let places = match text.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len(),
        None => 0,
    };

    Ok(places as u32)
}

/// Parse a threshold value, dropping trailing zeros ("10.00000000" -> 10).
pub fn parse_threshold(text: &str) -> RegistryResult<Decimal> {
    let text = text.trim();
    let value: Decimal = text
        .parse()
        .map_err(|e| RegistryError::ParseError(format!("{text:?}: {e}")))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(RegistryError::ParseError(format!(
            "{text:?}: threshold must not be negative"
        )));
    }

    Ok(value.normalize())
}

/// Resolves `SymbolConstraints` for the configured trading pair.
///
/// Resolution is a pure function of the metadata: the same input always
/// yields the same constraints.
#[derive(Debug, Clone)]
pub struct SymbolConstraintResolver {
    symbol: String,
}

impl SymbolConstraintResolver {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Derive constraints from the symbol's filter set.
    ///
    /// Fails if the metadata is for another symbol, the symbol is not
    /// trading, or any required filter/field is missing or malformed.
    pub fn resolve(&self, raw: &RawSymbolInfo) -> RegistryResult<SymbolConstraints> {
        if !raw.symbol.eq_ignore_ascii_case(&self.symbol) {
            return Err(RegistryError::SymbolMismatch {
                expected: self.symbol.clone(),
                actual: raw.symbol.clone(),
            });
        }

        if let Some(status) = raw.status.as_deref() {
            if status != "TRADING" {
                return Err(RegistryError::NotTrading {
                    symbol: raw.symbol.clone(),
                    status: status.to_string(),
                });
            }
        }

        let tick_size = raw
            .filters
            .iter()
            .find_map(|f| match f {
                RawFilter::PriceFilter { tick_size } => Some(tick_size.as_deref()),
                _ => None,
            })
            .ok_or(RegistryError::MissingFilter("PRICE_FILTER"))?
            .ok_or(RegistryError::MissingField("PRICE_FILTER.tickSize"))?;

        let (step_size, min_qty) = raw
            .filters
            .iter()
            .find_map(|f| match f {
                RawFilter::LotSize { step_size, min_qty } => {
                    Some((step_size.as_deref(), min_qty.as_deref()))
                }
                _ => None,
            })
            .ok_or(RegistryError::MissingFilter("LOT_SIZE"))?;
        let step_size = step_size.ok_or(RegistryError::MissingField("LOT_SIZE.stepSize"))?;
        let min_qty = min_qty.ok_or(RegistryError::MissingField("LOT_SIZE.minQty"))?;

        // MIN_NOTIONAL wins when both are published.
        let min_notional = raw
            .filters
            .iter()
            .find_map(|f| match f {
                RawFilter::MinNotional { min_notional } => Some(min_notional.as_deref()),
                _ => None,
            })
            .or_else(|| {
                raw.filters.iter().find_map(|f| match f {
                    RawFilter::Notional { min_notional } => Some(min_notional.as_deref()),
                    _ => None,
                })
            })
            .ok_or(RegistryError::MissingFilter("MIN_NOTIONAL"))?
            .ok_or(RegistryError::MissingField("MIN_NOTIONAL.minNotional"))?;

        let price_decimal_places = decimal_places(tick_size)?;
        let quantity_decimal_places = decimal_places(step_size)?;

        let mut min_quantity_increment = parse_threshold(min_qty)?;
        if min_quantity_increment.is_zero() {
            debug!(symbol = %raw.symbol, "minQty is zero, using stepSize as increment");
            min_quantity_increment = parse_threshold(step_size)?;
        }

        let constraints = SymbolConstraints {
            price_decimal_places,
            quantity_decimal_places,
            min_quantity_increment: Size::new(min_quantity_increment),
            min_notional_value: parse_threshold(min_notional)?,
        };

        info!(
            symbol = %raw.symbol,
            price_dp = constraints.price_decimal_places,
            quantity_dp = constraints.quantity_decimal_places,
            min_qty = %constraints.min_quantity_increment,
            min_notional = %constraints.min_notional_value,
            "Symbol constraints resolved"
        );

        Ok(constraints)
    }
}
