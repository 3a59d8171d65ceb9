//! Volatility gate ("wave candle" detection).
//!
//! The window is read most-recent-first. A run is "unbroken" when every
//! adjacent pair moves the same direction starting from the newest candle;
//! a single flat or reversed step breaks it. An unbroken run in either
//! direction across the whole window means the market is moving too
//! sharply to place a resting buy.

use crate::error::{RiskError, RiskResult};
use crate::gates::GateResult;
use spotloop_core::{Candle, Price};
use tracing::trace;

/// Direction of a run walking backward from the newest candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    /// Each older close is strictly below the newer one (price rose into now).
    Descending,
    /// Each older close is strictly above the newer one (price fell into now).
    Ascending,
}

impl Run {
    fn holds(self, current: Price, previous: Price) -> bool {
        match self {
            Self::Descending => current < previous,
            Self::Ascending => current > previous,
        }
    }
}

/// Scan `closes` (newest first) for an unbroken run in `direction`.
///
/// Index 0 has no trend, so a window of fewer than two closes never matches.
fn unbroken_run(closes: &[Price], direction: Run) -> bool {
    let mut matched = false;

    for index in 1..closes.len() {
        if index > 1 && !matched {
            break;
        }
        matched = direction.holds(closes[index], closes[index - 1]);
    }

    matched
}

/// Decide whether the trailing `window_size` candles form a monotonic run.
///
/// Takes the last `window_size` candles (or all of them if fewer are
/// supplied). Fails if `window_size` is zero or a close in the window is
/// not a positive price.
pub fn is_volatile(candles: &[Candle], window_size: usize) -> RiskResult<bool> {
    if window_size == 0 {
        return Err(RiskError::ConfigError(
            "volatility window size must be at least 1".to_string(),
        ));
    }

    let start = candles.len().saturating_sub(window_size);
    let closes = candles[start..]
        .iter()
        .rev()
        .map(|c| {
            if c.close.is_positive() {
                Ok(c.close)
            } else {
                Err(RiskError::DataUnavailable(format!(
                    "candle {} has no usable close ({})",
                    c.open_time, c.close
                )))
            }
        })
        .collect::<RiskResult<Vec<_>>>()?;

    let descending = unbroken_run(&closes, Run::Descending);
    let ascending = unbroken_run(&closes, Run::Ascending);

    trace!(
        window = closes.len(),
        descending,
        ascending,
        "Volatility scan"
    );

    Ok(descending || ascending)
}

/// Volatility gate bound to a configured window size.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityFilter {
    window_size: usize,
}

impl VolatilityFilter {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn is_volatile(&self, candles: &[Candle]) -> RiskResult<bool> {
        is_volatile(candles, self.window_size)
    }

    /// Gate form of [`Self::is_volatile`].
    pub fn check(&self, candles: &[Candle]) -> RiskResult<GateResult> {
        if self.is_volatile(candles)? {
            Ok(GateResult::Block(format!(
                "monotonic run across last {} candles",
                self.window_size
            )))
        } else {
            Ok(GateResult::Pass)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn candles(closes: &[Decimal]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| Candle::new(i as i64 * 60_000, Price::new(*c)))
            .collect()
    }

    #[test]
    fn test_strictly_rising_window_is_volatile() {
        let c = candles(&[dec!(100), dec!(101), dec!(102), dec!(103)]);
        assert!(is_volatile(&c, 4).unwrap());
    }

    #[test]
    fn test_strictly_falling_window_is_volatile() {
        let c = candles(&[dec!(103), dec!(102), dec!(101), dec!(100)]);
        assert!(is_volatile(&c, 4).unwrap());
    }

    #[test]
    fn test_broken_run_is_not_volatile() {
        // Newest step rises, the one before falls.
        let c = candles(&[dec!(100), dec!(102), dec!(101), dec!(103)]);
        assert!(!is_volatile(&c, 4).unwrap());

        // Run breaks only at the oldest step.
        let c = candles(&[dec!(104), dec!(101), dec!(102), dec!(103)]);
        assert!(!is_volatile(&c, 4).unwrap());
    }

    #[test]
    fn test_flat_step_breaks_run() {
        let c = candles(&[dec!(100), dec!(101), dec!(101), dec!(102)]);
        assert!(!is_volatile(&c, 4).unwrap());
    }

    #[test]
    fn test_only_trailing_window_is_inspected() {
        // Older candles are noisy, the last three rise.
        let c = candles(&[dec!(90), dec!(120), dec!(80), dec!(100), dec!(101), dec!(102)]);
        assert!(is_volatile(&c, 3).unwrap());
        assert!(!is_volatile(&c, 6).unwrap());
    }

    #[test]
    fn test_short_windows() {
        let c = candles(&[dec!(100)]);
        assert!(!is_volatile(&c, 1).unwrap());
        assert!(!is_volatile(&[], 4).unwrap());

        let c = candles(&[dec!(100), dec!(101)]);
        assert!(is_volatile(&c, 2).unwrap());
        assert!(!is_volatile(&c, 1).unwrap());
    }

    #[test]
    fn test_unusable_close_is_data_error() {
        let c = candles(&[dec!(100), dec!(0), dec!(102)]);
        let err = is_volatile(&c, 3).unwrap_err();
        assert!(matches!(err, RiskError::DataUnavailable(_)));

        // Outside the window it is ignored.
        assert!(is_volatile(&c, 1).is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let c = candles(&[dec!(100), dec!(101)]);
        assert!(matches!(
            is_volatile(&c, 0).unwrap_err(),
            RiskError::ConfigError(_)
        ));
    }

    #[test]
    fn test_run_direction_read_newest_first() {
        // Rising into now: newest first reads 103, 102, 101, 100.
        let rising = [dec!(103), dec!(102), dec!(101), dec!(100)].map(Price::new);
        assert!(unbroken_run(&rising, Run::Descending));
        assert!(!unbroken_run(&rising, Run::Ascending));

        // Falling into now: newest first reads 100, 101, 102, 103.
        let falling = [dec!(100), dec!(101), dec!(102), dec!(103)].map(Price::new);
        assert!(unbroken_run(&falling, Run::Ascending));
        assert!(!unbroken_run(&falling, Run::Descending));
    }

    #[test]
    fn test_filter_check() {
        let filter = VolatilityFilter::new(3);
        let rising = candles(&[dec!(1), dec!(2), dec!(3)]);
        let choppy = candles(&[dec!(1), dec!(3), dec!(2)]);

        assert!(filter.check(&rising).unwrap().is_block());
        assert!(filter.check(&choppy).unwrap().is_pass());
    }
}
