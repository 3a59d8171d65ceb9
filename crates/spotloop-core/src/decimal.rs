//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors critical in financial calculations.
//!
//! Exchange precision is expressed as a number of decimal places. Values sent
//! to the exchange are truncated toward zero and then padded, so their text
//! always carries exactly the declared number of fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Truncate `value` toward zero at `dp` places and pad the scale to `dp`.
#[inline]
pub fn truncate_to_places(value: Decimal, dp: u32) -> Decimal {
    let mut truncated = value.round_dp_with_strategy(dp, RoundingStrategy::ToZero);
    truncated.rescale(dp);
    truncated
}

/// Round `value` half away from zero at `dp` places and pad the scale to `dp`.
#[inline]
pub fn round_to_places(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Truncate toward zero to `dp` decimal places (exchange price precision).
    #[inline]
    pub fn truncate_dp(&self, dp: u32) -> Self {
        Self(truncate_to_places(self.0, dp))
    }

    /// Apply a percentage markup: `price * (1 + percent / 100)`.
    #[inline]
    pub fn markup(&self, percent: Decimal) -> Self {
        Self(self.0 * (Decimal::ONE + percent / ONE_HUNDRED))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Price {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Size/quantity with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// sizes with prices in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Truncate toward zero to `dp` decimal places (exchange quantity precision).
    #[inline]
    pub fn truncate_dp(&self, dp: u32) -> Self {
        Self(truncate_to_places(self.0, dp))
    }

    /// Round half away from zero to `dp` decimal places.
    #[inline]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(round_to_places(self.0, dp))
    }

    /// Size left after a percentage fee is taken: `size - size * percent / 100`.
    #[inline]
    pub fn less_percent(&self, percent: Decimal) -> Self {
        Self(self.0 - self.0 * percent / ONE_HUNDRED)
    }

    /// Calculate notional value: size * price.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Size {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Size {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_truncate_dp() {
        let price = Price::new(dec!(12345.6789));

        let truncated = price.truncate_dp(2);
        assert_eq!(truncated.0, dec!(12345.67));
        assert_eq!(truncated.to_string(), "12345.67");
    }

    #[test]
    fn test_truncate_pads_fractional_digits() {
        let size = Size::new(dec!(1.2));
        assert_eq!(size.truncate_dp(3).to_string(), "1.200");

        let whole = Size::new(dec!(7));
        assert_eq!(whole.truncate_dp(0).to_string(), "7");
    }

    #[test]
    fn test_truncate_is_toward_zero() {
        assert_eq!(truncate_to_places(dec!(0.99999), 4), dec!(0.9999));
        assert_eq!(truncate_to_places(dec!(-1.239), 2), dec!(-1.23));
    }

    #[test]
    fn test_round_dp_half_away_from_zero() {
        let size = Size::new(dec!(1.2345));
        assert_eq!(size.round_dp(3).0, dec!(1.235));

        let size = Size::new(dec!(1.2344));
        assert_eq!(size.round_dp(3).0, dec!(1.234));
    }

    #[test]
    fn test_price_markup() {
        let price = Price::new(dec!(100));
        assert_eq!(price.markup(dec!(0.5)).0, dec!(100.5));
        assert_eq!(price.markup(Decimal::ZERO).0, dec!(100));
    }

    #[test]
    fn test_size_less_percent() {
        let size = Size::new(dec!(10));
        assert_eq!(size.less_percent(dec!(0.1)).0, dec!(9.99));
    }

    #[test]
    fn test_notional_calculation() {
        let size = Size::new(dec!(0.5));
        let price = Price::new(dec!(50000));

        let notional = size.notional(price);
        assert_eq!(notional, dec!(25000));
    }
}
