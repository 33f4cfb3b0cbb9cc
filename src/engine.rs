use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Ema, EmaConfig, Error, Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorRow,
    IndicatorSeries, Macd, MacdConfig, Ohlcv, Price, Result, Rsi, RsiConfig, Signal,
    SignalSeries, Smoothing, Timestamp,
};

/// Parameters of the whole indicator and signal pipeline.
///
/// The default is the classic scalping setup: EMA(20) and EMA(50) of the
/// close, RSI(14) against a midline of 50, MACD(12, 26, 9), all EMAs
/// seeded with their first input.
///
/// # Example
///
/// ```
/// use quantedge_signals::{IndicatorConfig, IndicatorConfigBuilder, SignalConfig, Smoothing};
/// use std::num::NonZero;
///
/// let config = SignalConfig::builder()
///     .ema_long(NonZero::new(100).unwrap())
///     .smoothing(Smoothing::Adjusted)
///     .build();
///
/// assert_eq!(config.ema_long().length(), 100);
/// assert_eq!(config.rsi().length(), 14);
/// assert_eq!(config.required_bars(), 15);
/// ```
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SignalConfig {
    ema_short: EmaConfig,
    ema_long: EmaConfig,
    rsi: RsiConfig,
    macd: MacdConfig,
    rsi_midline: Price,
}

impl IndicatorConfig for SignalConfig {
    type Builder = SignalConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SignalConfigBuilder::new()
    }

    /// Bars until a non-neutral signal is possible: the RSI warm-up.
    #[inline]
    fn required_bars(&self) -> usize {
        self.rsi.required_bars()
    }
}

impl SignalConfig {
    /// Short overlay EMA (default 20).
    #[inline]
    #[must_use]
    pub fn ema_short(&self) -> EmaConfig {
        self.ema_short
    }

    /// Trend-filter EMA compared against the close (default 50).
    #[inline]
    #[must_use]
    pub fn ema_long(&self) -> EmaConfig {
        self.ema_long
    }

    #[inline]
    #[must_use]
    pub fn rsi(&self) -> RsiConfig {
        self.rsi
    }

    #[inline]
    #[must_use]
    pub fn macd(&self) -> MacdConfig {
        self.macd
    }

    /// RSI level separating bullish from bearish momentum (default 50).
    #[inline]
    #[must_use]
    pub fn rsi_midline(&self) -> Price {
        self.rsi_midline
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for SignalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SignalConfig(EMA {}/{}, RSI {} vs {}, MACD {}/{}/{}, {})",
            self.ema_short.length(),
            self.ema_long.length(),
            self.rsi.length(),
            self.rsi_midline,
            self.macd.fast(),
            self.macd.slow(),
            self.macd.signal(),
            self.ema_long.smoothing(),
        )
    }
}

/// Builder for [`SignalConfig`].
///
/// Every field has a default, see [`SignalConfig`].
pub struct SignalConfigBuilder {
    ema_short: NonZero<usize>,
    ema_long: NonZero<usize>,
    rsi_length: NonZero<usize>,
    macd_fast: NonZero<usize>,
    macd_slow: NonZero<usize>,
    macd_signal: NonZero<usize>,
    rsi_midline: Price,
    smoothing: Smoothing,
}

impl SignalConfigBuilder {
    const EMA_SHORT: NonZero<usize> = NonZero::new(20).unwrap();
    const EMA_LONG: NonZero<usize> = NonZero::new(50).unwrap();
    const RSI_LENGTH: NonZero<usize> = NonZero::new(14).unwrap();
    const MACD_FAST: NonZero<usize> = NonZero::new(12).unwrap();
    const MACD_SLOW: NonZero<usize> = NonZero::new(26).unwrap();
    const MACD_SIGNAL: NonZero<usize> = NonZero::new(9).unwrap();

    fn new() -> Self {
        Self {
            ema_short: Self::EMA_SHORT,
            ema_long: Self::EMA_LONG,
            rsi_length: Self::RSI_LENGTH,
            macd_fast: Self::MACD_FAST,
            macd_slow: Self::MACD_SLOW,
            macd_signal: Self::MACD_SIGNAL,
            rsi_midline: 50.0,
            smoothing: Smoothing::Recursive,
        }
    }

    #[inline]
    #[must_use]
    pub fn ema_short(mut self, length: NonZero<usize>) -> Self {
        self.ema_short = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn ema_long(mut self, length: NonZero<usize>) -> Self {
        self.ema_long = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn rsi_length(mut self, length: NonZero<usize>) -> Self {
        self.rsi_length = length;
        self
    }

    /// Sets the fast, slow and signal spans of MACD.
    #[inline]
    #[must_use]
    pub fn macd(
        mut self,
        fast: NonZero<usize>,
        slow: NonZero<usize>,
        signal: NonZero<usize>,
    ) -> Self {
        self.macd_fast = fast;
        self.macd_slow = slow;
        self.macd_signal = signal;
        self
    }

    #[inline]
    #[must_use]
    pub fn rsi_midline(mut self, midline: Price) -> Self {
        self.rsi_midline = midline;
        self
    }

    /// Weighting scheme of every EMA in the pipeline.
    #[inline]
    #[must_use]
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    fn ema(&self, length: NonZero<usize>) -> EmaConfig {
        EmaConfig::builder()
            .length(length)
            .smoothing(self.smoothing)
            .build()
    }
}

impl IndicatorConfigBuilder<SignalConfig> for SignalConfigBuilder {
    fn build(self) -> SignalConfig {
        SignalConfig {
            ema_short: self.ema(self.ema_short),
            ema_long: self.ema(self.ema_long),
            rsi: RsiConfig::close(self.rsi_length),
            macd: MacdConfig::builder()
                .fast(self.macd_fast)
                .slow(self.macd_slow)
                .signal(self.macd_signal)
                .smoothing(self.smoothing)
                .build(),
            rsi_midline: self.rsi_midline,
        }
    }
}

/// Indicator values and the classified signal of one bar.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Snapshot {
    pub row: IndicatorRow,
    pub signal: Signal,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.row.rsi {
            Some(rsi) => write!(
                f,
                "{} (EMA {:.5}, RSI {rsi:.2}, MACD {:.6} / {:.6})",
                self.signal, self.row.ema_long, self.row.macd, self.row.macd_signal
            ),
            None => write!(
                f,
                "{} (EMA {:.5}, RSI warming up, MACD {:.6} / {:.6})",
                self.signal, self.row.ema_long, self.row.macd, self.row.macd_signal
            ),
        }
    }
}

/// The indicators of the pipeline, advanced together one bar at a time.
#[derive(Clone, Debug)]
struct IndicatorBank {
    ema_short: Ema,
    ema_long: Ema,
    rsi: Rsi,
    macd: Macd,
}

impl IndicatorBank {
    fn new(config: &SignalConfig) -> Self {
        Self {
            ema_short: Ema::new(config.ema_short),
            ema_long: Ema::new(config.ema_long),
            rsi: Rsi::new(config.rsi),
            macd: Macd::new(config.macd),
        }
    }

    #[inline]
    fn advance(&mut self, ohlcv: &impl Ohlcv) -> IndicatorRow {
        IndicatorRow::new(
            self.ema_short.advance(ohlcv),
            self.ema_long.advance(ohlcv),
            self.rsi.compute(ohlcv),
            self.macd.advance(ohlcv),
        )
    }
}

/// Streaming signal pipeline: EMAs, RSI and MACD plus classification,
/// one bar at a time.
///
/// Produces a [`Snapshot`] for every bar, identical to the row and label
/// [`compute_indicators`] and [`classify_signals`] give for the same bar
/// of a whole series. The first bar is always [`Signal::Neutral`].
///
/// # Example
///
/// ```
/// use quantedge_signals::{Signal, SignalConfig, SignalEngine};
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
/// let mut engine = SignalEngine::new(SignalConfig::default());
///
/// let mut last = None;
/// for t in 0..30 {
///     last = engine.compute(&Bar(1.08 + 0.0005 * t as f64, t));
/// }
///
/// assert_eq!(last.map(|s| s.signal), Some(Signal::Long));
/// ```
#[derive(Clone, Debug)]
pub struct SignalEngine {
    config: SignalConfig,
    bank: IndicatorBank,
    current: Option<Snapshot>,
    last_open_time: Option<Timestamp>,
}

impl Indicator for SignalEngine {
    type Config = SignalConfig;
    type Output = Snapshot;

    fn new(config: Self::Config) -> Self {
        Self {
            bank: IndicatorBank::new(&config),
            config,
            current: None,
            last_open_time: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Snapshot> {
        let is_first = self.last_open_time.is_none();
        self.last_open_time = Some(ohlcv.open_time());

        let row = self.bank.advance(ohlcv);
        let signal = if is_first {
            Signal::Neutral
        } else {
            Signal::classify(ohlcv.close(), &row, self.config.rsi_midline)
        };

        self.current = Some(Snapshot { row, signal });
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Snapshot> {
        self.current
    }
}

impl Display for SignalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignalEngine({})", self.config)
    }
}

/// Checks the series is non-empty with strictly increasing open times.
fn validate_series<B: Ohlcv>(series: &[B]) -> Result<()> {
    if series.is_empty() {
        return Err(Error::EmptyInput);
    }

    series
        .windows(2)
        .enumerate()
        .try_for_each(|(i, pair)| {
            let (previous, current) = (pair[0].open_time(), pair[1].open_time());
            if previous < current {
                Ok(())
            } else {
                Err(Error::NonIncreasingTimestamp {
                    index: i + 1,
                    previous,
                    current,
                })
            }
        })
}

/// Computes EMA(20), EMA(50), EMA(12), EMA(26), RSI(14), MACD and its
/// 9-bar signal line over a whole price series.
///
/// Shorthand for [`compute_indicators_with`] and the default
/// [`SignalConfig`].
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty series,
/// [`Error::NonIncreasingTimestamp`] if open times are not strictly
/// increasing.
pub fn compute_indicators<B: Ohlcv>(series: &[B]) -> Result<IndicatorSeries> {
    compute_indicators_with(series, &SignalConfig::default())
}

/// Computes the indicators configured in `config` over a whole price
/// series.
///
/// The output has one row per bar. Pure: the same input always gives
/// bit-identical output.
///
/// # Errors
///
/// See [`compute_indicators`].
pub fn compute_indicators_with<B: Ohlcv>(
    series: &[B],
    config: &SignalConfig,
) -> Result<IndicatorSeries> {
    validate_series(series)?;

    let mut bank = IndicatorBank::new(config);
    let mut indicators = IndicatorSeries::with_capacity(series.len());
    for bar in series {
        indicators.push(bank.advance(bar));
    }

    debug!(
        bars = series.len(),
        rsi_warm_up = config.rsi.length().min(series.len()),
        "computed indicators"
    );

    Ok(indicators)
}

/// Labels every bar LONG, SHORT or NONE from its indicator values.
///
/// Shorthand for [`classify_signals_with`] and the default
/// [`SignalConfig`] (RSI midline 50).
///
/// # Errors
///
/// See [`classify_signals_with`].
pub fn classify_signals<B: Ohlcv>(
    series: &[B],
    indicators: &IndicatorSeries,
) -> Result<SignalSeries> {
    classify_signals_with(series, indicators, &SignalConfig::default())
}

/// Labels every bar LONG, SHORT or NONE from its indicator values.
///
/// Each bar is judged on its own by [`Signal::classify`]; the first bar
/// is always [`Signal::Neutral`]. No bar is ever both LONG and SHORT.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty series, [`Error::LengthMismatch`]
/// if `indicators` does not have one row per bar.
pub fn classify_signals_with<B: Ohlcv>(
    series: &[B],
    indicators: &IndicatorSeries,
    config: &SignalConfig,
) -> Result<SignalSeries> {
    if series.is_empty() {
        return Err(Error::EmptyInput);
    }
    if indicators.len() != series.len() {
        return Err(Error::LengthMismatch {
            prices: series.len(),
            indicators: indicators.len(),
        });
    }

    let signals: SignalSeries = series
        .iter()
        .zip(indicators.rows())
        .enumerate()
        .map(|(i, (bar, row))| {
            if i == 0 {
                Signal::Neutral
            } else {
                Signal::classify(bar.close(), &row, config.rsi_midline)
            }
        })
        .collect();

    debug!(
        bars = signals.len(),
        long = signals.count(Signal::Long),
        short = signals.count(Signal::Short),
        none = signals.count(Signal::Neutral),
        current = %signals.current(),
        "classified signals"
    );

    Ok(signals)
}

/// Indicators and signals of one price series, ready for charting.
#[derive(PartialEq, Clone, Debug, serde::Serialize)]
pub struct Evaluation {
    pub indicators: IndicatorSeries,
    pub signals: SignalSeries,
}

impl Evaluation {
    /// Label of the most recent bar.
    #[must_use]
    pub fn current_signal(&self) -> Signal {
        self.signals.current()
    }

    /// Indicator values of the most recent bar.
    #[must_use]
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.indicators.len().checked_sub(1).and_then(|i| self.indicators.row(i))
    }
}

/// Runs [`compute_indicators_with`] then [`classify_signals_with`].
///
/// # Errors
///
/// See [`compute_indicators`].
pub fn evaluate<B: Ohlcv>(series: &[B], config: &SignalConfig) -> Result<Evaluation> {
    let indicators = compute_indicators_with(series, config)?;
    let signals = classify_signals_with(series, &indicators, config)?;

    Ok(Evaluation {
        indicators,
        signals,
    })
}
