//! Trend and momentum signals for intraday price series.
//!
//! Computes EMA(20), EMA(50), RSI(14) and MACD(12, 26, 9) over a series of
//! bars and labels every bar LONG, SHORT or NONE:
//!
//! * LONG when the close is above EMA(50), RSI is above 50 and MACD is
//!   above its signal line,
//! * SHORT when all three are below,
//! * NONE otherwise, on the first bar, and while RSI is warming up.
//!
//! [`compute_indicators`] and [`classify_signals`] work on a whole series.
//! The same math is available bar by bar: [`Ema`], [`Rsi`], [`Macd`] and
//! the composite [`SignalEngine`] accept any type implementing [`Ohlcv`].
//! Each exposes [`new`](Ema::new), [`compute`](Ema::compute) and
//! [`value`](Ema::value) as inherent methods, so no trait import is
//! needed. Import [`Indicator`] only for generic code.
//!
//! [`evaluate_market`] glues a [`PriceProvider`] to the pipeline for a
//! user-selected [`MarketConfig`].

mod ema;
mod engine;
mod error;
mod indicator;
mod macd;
mod market;
mod ohlcv;
mod provider;
mod rolling;
mod rsi;
mod series;
mod signal;
mod smoothing;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price, PricePoint, Timestamp};

pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdValue};
pub use crate::rsi::{FLAT_MARKET_RSI, Rsi, RsiConfig, RsiConfigBuilder};
pub use crate::smoothing::Smoothing;

pub use crate::engine::{
    Evaluation, SignalConfig, SignalConfigBuilder, SignalEngine, Snapshot, classify_signals,
    classify_signals_with, compute_indicators, compute_indicators_with, evaluate,
};
pub use crate::series::{IndicatorRow, IndicatorSeries, SignalSeries};
pub use crate::signal::Signal;

pub use crate::market::{ConfigError, Instrument, MarketConfig, Timeframe};
pub use crate::provider::{MarketError, PriceProvider, evaluate_market};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, kline: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, kline)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Rsi, RsiConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);
impl_indicator_methods!(SignalEngine, SignalConfig, Snapshot);

#[cfg(test)]
mod test_util;
