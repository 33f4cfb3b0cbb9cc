use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Must be strictly increasing along a price series.
pub type Timestamp = u64;

/// OHLC bar data used as input to the indicators and the signal pipeline.
///
/// Implement this on your own kline/candle type to avoid conversion into
/// [`PricePoint`]. Every computation in this crate reads the
/// [`close`](Ohlcv::close) price; the remaining fields are carried for
/// callers that chart the same bars.
///
/// The usual bar invariant (`low <= min(open, close)` and
/// `high >= max(open, close)`) is assumed, never checked.
///
/// # Example
///
/// ```
/// use quantedge_signals::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Consecutive bars fed to an indicator must have strictly increasing
    /// values. The batch functions reject a series that violates this with
    /// [`Error::NonIncreasingTimestamp`](crate::Error::NonIncreasingTimestamp).
    fn open_time(&self) -> Timestamp;
}

/// A single candlestick of a price series.
///
/// Plain value type for callers that do not have their own bar type.
/// Deserializes from records such as
/// `{"open_time": 1, "open": 1.1, "high": 1.2, "low": 1.0, "close": 1.15}`.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PricePoint {
    pub open_time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl PricePoint {
    /// Creates a bar from its timestamp and OHLC prices.
    #[must_use]
    pub fn new(open_time: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
        }
    }
}

impl Ohlcv for PricePoint {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

impl<T: Ohlcv> Ohlcv for &T {
    #[inline]
    fn open(&self) -> Price {
        (**self).open()
    }

    #[inline]
    fn high(&self) -> Price {
        (**self).high()
    }

    #[inline]
    fn low(&self) -> Price {
        (**self).low()
    }

    #[inline]
    fn close(&self) -> Price {
        (**self).close()
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        (**self).open_time()
    }
}
