use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, Smoothing, Timestamp,
    smoothing::ExpSmoother,
};

/// Configuration for the Moving Average Convergence Divergence
/// ([`Macd`]) indicator.
///
/// Defaults to the classic 12 / 26 / 9 setup with recursive
/// smoothing. All three EMAs are seeded with their first input, so
/// MACD and its signal line are defined from the first bar.
///
/// # Example
///
/// ```
/// use quantedge_signals::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast(NonZero::new(8).unwrap())
///     .slow(NonZero::new(21).unwrap())
///     .build();
///
/// assert_eq!(config.fast(), 8);
/// assert_eq!(config.slow(), 21);
/// assert_eq!(config.signal(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: usize,
    slow: usize,
    signal: usize,
    smoothing: Smoothing,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn required_bars(&self) -> usize {
        1
    }
}

impl MacdConfig {
    /// Span of the fast EMA.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    /// Span of the slow EMA.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
    }

    /// Span of the signal-line EMA over MACD values.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }

    /// Weighting scheme shared by all three EMAs.
    #[inline]
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.smoothing
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9,
/// smoothing = [`Smoothing::Recursive`].
pub struct MacdConfigBuilder {
    fast: usize,
    slow: usize,
    signal: usize,
    smoothing: Smoothing,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            smoothing: Smoothing::Recursive,
        }
    }

    /// Sets the fast EMA span.
    #[inline]
    #[must_use]
    pub fn fast(mut self, length: NonZero<usize>) -> Self {
        self.fast = length.get();
        self
    }

    /// Sets the slow EMA span.
    #[inline]
    #[must_use]
    pub fn slow(mut self, length: NonZero<usize>) -> Self {
        self.slow = length.get();
        self
    }

    /// Sets the signal-line EMA span.
    #[inline]
    #[must_use]
    pub fn signal(mut self, length: NonZero<usize>) -> Self {
        self.signal = length.get();
        self
    }

    /// Sets the weighting scheme of all three EMAs.
    #[inline]
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
            smoothing: self.smoothing,
        }
    }
}

/// MACD output for one bar.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct MacdValue {
    fast: Price,
    slow: Price,
    macd: Price,
    signal: Price,
}

impl MacdValue {
    /// Fast EMA of the close.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> Price {
        self.fast
    }

    /// Slow EMA of the close.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> Price {
        self.slow
    }

    /// MACD line: `fast − slow`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Signal line: EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// Histogram: `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.macd - self.signal
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MACD(macd={}, signal={})", self.macd, self.signal)
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// MACD[t]   = EMA_fast(close)[t] − EMA_slow(close)[t]
/// signal[t] = EMA_signal(MACD)[t]
/// ```
///
/// Every EMA is seeded with its first input, so the first bar yields
/// `macd = 0` and `signal = 0`.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Macd, MacdConfig};
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
/// let mut macd = Macd::new(MacdConfig::default());
///
/// let first = macd.compute(&Bar(1.10, 1)).unwrap();
/// assert_eq!(first.macd(), 0.0);
///
/// // Rising close: the fast EMA pulls ahead of the slow one
/// let second = macd.compute(&Bar(1.12, 2)).unwrap();
/// assert!(second.macd() > second.signal());
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: ExpSmoother,
    slow: ExpSmoother,
    signal: ExpSmoother,
    current: Option<MacdValue>,
    last_open_time: Option<Timestamp>,
}

impl Macd {
    /// Feeds the next bar; MACD is defined on every bar.
    #[inline]
    pub(crate) fn advance(&mut self, ohlcv: &impl Ohlcv) -> MacdValue {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );
        self.last_open_time = Some(ohlcv.open_time());

        let close = ohlcv.close();
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        let macd = fast - slow;
        let signal = self.signal.update(macd);

        let value = MacdValue {
            fast,
            slow,
            macd,
            signal,
        };
        self.current = Some(value);
        value
    }
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: ExpSmoother::new(config.fast, config.smoothing),
            slow: ExpSmoother::new(config.slow, config.smoothing),
            signal: ExpSmoother::new(config.signal, config.smoothing),
            current: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<MacdValue> {
        Some(self.advance(ohlcv))
    }

    #[inline]
    fn value(&self) -> Option<MacdValue> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal
        )
    }
}
