use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, Timestamp,
    rolling::RollingWindow,
};

/// RSI reported when the window holds neither gains nor losses.
///
/// A flat market has no momentum either way, so it sits on the midline.
/// Being exactly 50 it never passes a strict `> 50` / `< 50` test.
pub const FLAT_MARKET_RSI: Price = 50.0;

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI averages the last `length` close-to-close changes with a simple
/// mean, so the first value appears on bar `length + 1`.
///
/// # Example
///
/// ```
/// use quantedge_signals::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.required_bars(), 15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn required_bars(&self) -> usize {
        self.length + 1
    }
}

impl RsiConfig {
    /// Number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({})", self.length)
    }
}

/// Builder for [`RsiConfig`].
///
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self { length: None }
    }

    /// Sets the number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Relative Strength Index (RSI) over a simple rolling mean.
///
/// Measures the balance of recent gains and losses on a 0–100
/// scale. Each bar after the first contributes one close-to-close
/// change, split into a gain and a loss:
///
/// ```text
/// gain     = max(close[t] − close[t − 1], 0)
/// loss     = max(close[t − 1] − close[t], 0)
/// avg_gain = mean of the last `length` gains
/// avg_loss = mean of the last `length` losses
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// Division by zero is never propagated: with no losses and some gains
/// the RSI saturates at exactly 100, and with neither it is
/// [`FLAT_MARKET_RSI`].
///
/// # Example
///
/// ```
/// use quantedge_signals::{Rsi, RsiConfig};
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
/// let mut rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
///
/// // Warm-up: need 3 price changes (4 bars)
/// assert_eq!(rsi.compute(&Bar(10.0, 1)), None);
/// assert_eq!(rsi.compute(&Bar(12.0, 2)), None);
/// assert_eq!(rsi.compute(&Bar(11.0, 3)), None);
///
/// // Bar 4: changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// assert_eq!(rsi.compute(&Bar(13.0, 4)), Some(80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    gains: RollingWindow,
    losses: RollingWindow,
    prev_close: Option<Price>,
    current: Option<Price>,
    last_open_time: Option<Timestamp>,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            gains: RollingWindow::new(config.length),
            losses: RollingWindow::new(config.length),
            prev_close: None,
            current: None,
            last_open_time: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t < ohlcv.open_time()),
            "open_time must be strictly increasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );
        self.last_open_time = Some(ohlcv.open_time());

        let close = ohlcv.close();
        if let Some(prev_close) = self.prev_close.replace(close) {
            let (gain, loss) = Self::gain_and_loss(prev_close, close);
            self.gains.push(gain);
            self.losses.push(loss);
        }

        self.current = self
            .gains
            .mean()
            .zip(self.losses.mean())
            .map(|(avg_gain, avg_loss)| Self::rsi_from_averages(avg_gain, avg_loss));

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                FLAT_MARKET_RSI
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.config.length)
    }
}
