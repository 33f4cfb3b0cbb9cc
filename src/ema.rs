use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, Smoothing, Timestamp,
    smoothing::ExpSmoother,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// The EMA is seeded with the first close, so it is defined from the
/// first bar onward: [`required_bars`](IndicatorConfig::required_bars)
/// is always 1.
///
/// # Example
///
/// ```
/// use quantedge_signals::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder, Smoothing};
/// use std::num::NonZero;
///
/// let config = EmaConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .smoothing(Smoothing::Adjusted)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_bars(), 1);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    smoothing: Smoothing,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn required_bars(&self) -> usize {
        1
    }
}

impl EmaConfig {
    /// Span of the average (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Weighting scheme. Default: [`Smoothing::Recursive`].
    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Recursive EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// Bias-adjusted EMA on closing price.
    #[must_use]
    pub fn adjusted(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .smoothing(Smoothing::Adjusted)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.smoothing)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: smoothing = [`Smoothing::Recursive`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    smoothing: Smoothing,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            smoothing: Smoothing::Recursive,
        }
    }

    /// Sets the span of the average.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the weighting scheme.
    #[inline]
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            smoothing: self.smoothing,
        }
    }
}

/// Exponential Moving Average (EMA) of the close.
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`:
///
/// ```text
/// EMA[0] = close[0]
/// EMA[t] = α × close[t] + (1 − α) × EMA[t − 1]
/// ```
///
/// There is no warm-up gap: the first bar yields its own close. O(1)
/// memory and a single fused multiply-add per bar. See [`Smoothing`] for
/// the bias-adjusted alternative.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Ema, EmaConfig};
/// use std::num::NonZero;
/// # use quantedge_signals::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, u64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp { self.1 }
/// # }
///
/// let mut ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
///
/// // Seeded with the first close
/// assert_eq!(ema.compute(&Bar(2.0, 1)), Some(2.0));
///
/// // EMA(3) α = 0.5: 4 × 0.5 + 2 × 0.5 = 3.0
/// assert_eq!(ema.compute(&Bar(4.0, 2)), Some(3.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    smoother: ExpSmoother,
    current: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl Ema {
    /// Feeds the next bar; the EMA is defined on every bar.
    #[inline]
    pub(crate) fn advance(&mut self, ohlcv: &impl Ohlcv) -> Price {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );
        self.last_open_time = Some(ohlcv.open_time());

        let value = self.smoother.update(ohlcv.close());
        self.current = Some(value);
        value
    }
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            smoother: ExpSmoother::new(config.length, config.smoothing),
            current: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Price> {
        Some(self.advance(ohlcv))
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.smoothing)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{bar, nz};

    fn ema(length: usize) -> Ema {
        Ema::new(EmaConfig::builder().length(nz(length)).build())
    }

    mod seeding {
        use super::*;

        #[test]
        fn none_before_first_bar() {
            assert_eq!(ema(20).value(), None);
        }

        #[test]
        fn first_value_is_first_close() {
            let mut ema = ema(20);
            assert_eq!(ema.compute(&bar(1.08503, 1)), Some(1.08503));
        }

        #[test]
        fn adjusted_first_value_is_first_close() {
            let mut ema = Ema::new(EmaConfig::adjusted(nz(50)));
            assert_eq!(ema.compute(&bar(1.08503, 1)), Some(1.08503));
        }
    }

    mod computation {
        use super::*;

        #[test]
        fn applies_formula() {
            // EMA(3): α = 0.5
            let mut ema = ema(3);
            ema.compute(&bar(2.0, 1));
            assert_eq!(ema.compute(&bar(4.0, 2)), Some(3.0));
            // 8 × 0.5 + 3 × 0.5 = 5.5
            assert_eq!(ema.compute(&bar(8.0, 3)), Some(5.5));
        }

        #[test]
        fn matches_textbook_form() {
            // EMA(20): α = 2/21
            let alpha = 2.0 / 21.0;
            let closes = [1.0850, 1.0853, 1.0849, 1.0860, 1.0858];
            let mut ema = ema(20);
            let mut expected = closes[0];
            for (i, &c) in closes.iter().enumerate() {
                if i > 0 {
                    expected = alpha * c + (1.0 - alpha) * expected;
                }
                let value = ema.compute(&bar(c, i as u64 + 1)).unwrap();
                assert!((value - expected).abs() < 1e-14, "{value} vs {expected}");
            }
        }

        #[test]
        fn constant_input_stays_constant() {
            let mut ema = ema(50);
            for i in 1..=100 {
                assert_eq!(ema.compute(&bar(1.1, i)), Some(1.1));
            }
        }

        #[test]
        fn lags_behind_rising_prices() {
            let mut ema = ema(12);
            ema.compute(&bar(1.0, 1));
            for i in 2..=30 {
                let close = 1.0 + 0.01 * i as f64;
                assert!(ema.compute(&bar(close, i)).unwrap() < close);
            }
        }
    }

    mod window_size_one {
        use super::*;

        #[test]
        fn always_equals_latest_price() {
            // EMA(1): α = 2/(1+1) = 1.0
            let mut ema = ema(1);
            ema.compute(&bar(10.0, 1));
            assert_eq!(ema.compute(&bar(20.0, 2)), Some(20.0));
            assert_eq!(ema.compute(&bar(5.0, 3)), Some(5.0));
        }
    }

    mod clone {
        use super::*;

        #[test]
        fn produces_independent_state() {
            let mut ema = ema(3);
            ema.compute(&bar(2.0, 1));

            let mut cloned = ema.clone();

            assert_eq!(ema.compute(&bar(4.0, 2)), Some(3.0));
            assert_eq!(cloned.value(), Some(2.0));
            assert_eq!(cloned.compute(&bar(10.0, 2)), Some(6.0));
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn recursive_by_default() {
            let config = EmaConfig::builder().length(nz(10)).build();
            assert_eq!(config.smoothing(), Smoothing::Recursive);
        }

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = EmaConfig::builder().build();
        }

        #[test]
        fn helpers() {
            assert_eq!(EmaConfig::close(nz(20)).length(), 20);
            assert_eq!(EmaConfig::adjusted(nz(9)).smoothing(), Smoothing::Adjusted);
        }

        #[test]
        fn eq_and_hash() {
            let a = EmaConfig::close(nz(20));
            let b = EmaConfig::close(nz(20));
            let c = EmaConfig::adjusted(nz(20));

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(ema(20).to_string(), "EMA(20, Recursive)");
            assert_eq!(
                EmaConfig::adjusted(nz(50)).to_string(),
                "EmaConfig(50, Adjusted)"
            );
        }
    }

    #[cfg(debug_assertions)]
    mod invariants {
        use super::*;

        #[test]
        #[should_panic(expected = "open_time must be strictly increasing")]
        fn panics_on_repeated_open_time() {
            let mut ema = ema(3);
            ema.compute(&bar(10.0, 2));
            ema.compute(&bar(12.0, 2));
        }
    }
}
