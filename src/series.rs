use std::ops::Index;

use serde::Serialize;

use crate::{MacdValue, Price, Signal};

/// Indicator values for a single bar.
///
/// Field names describe the role, not the span: with the default
/// [`SignalConfig`](crate::SignalConfig) they are EMA(20), EMA(50),
/// EMA(12), EMA(26), RSI(14), MACD and its 9-bar signal line.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct IndicatorRow {
    /// Short overlay EMA of the close (EMA20).
    pub ema_short: Price,
    /// Trend-filter EMA of the close (EMA50).
    pub ema_long: Price,
    /// Fast MACD component (EMA12).
    pub macd_fast: Price,
    /// Slow MACD component (EMA26).
    pub macd_slow: Price,
    /// RSI, `None` during warm-up.
    pub rsi: Option<Price>,
    pub macd: Price,
    pub macd_signal: Price,
}

impl IndicatorRow {
    pub(crate) fn new(
        ema_short: Price,
        ema_long: Price,
        rsi: Option<Price>,
        macd: MacdValue,
    ) -> Self {
        Self {
            ema_short,
            ema_long,
            macd_fast: macd.fast(),
            macd_slow: macd.slow(),
            rsi,
            macd: macd.macd(),
            macd_signal: macd.signal(),
        }
    }
}

/// Column-oriented indicator output, index-aligned with the price series.
///
/// Every column has exactly one entry per input bar. EMA and MACD columns
/// are defined from the first bar; the RSI column holds `None` until its
/// window has filled.
#[derive(PartialEq, Clone, Debug, Default, Serialize)]
pub struct IndicatorSeries {
    ema_short: Vec<Price>,
    ema_long: Vec<Price>,
    macd_fast: Vec<Price>,
    macd_slow: Vec<Price>,
    rsi: Vec<Option<Price>>,
    macd: Vec<Price>,
    macd_signal: Vec<Price>,
}

impl IndicatorSeries {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            ema_short: Vec::with_capacity(capacity),
            ema_long: Vec::with_capacity(capacity),
            macd_fast: Vec::with_capacity(capacity),
            macd_slow: Vec::with_capacity(capacity),
            rsi: Vec::with_capacity(capacity),
            macd: Vec::with_capacity(capacity),
            macd_signal: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, row: IndicatorRow) {
        self.ema_short.push(row.ema_short);
        self.ema_long.push(row.ema_long);
        self.macd_fast.push(row.macd_fast);
        self.macd_slow.push(row.macd_slow);
        self.rsi.push(row.rsi);
        self.macd.push(row.macd);
        self.macd_signal.push(row.macd_signal);
    }

    /// Number of bars covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ema_short.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ema_short.is_empty()
    }

    /// Values of bar `index`, `None` past the end.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        (index < self.len()).then(|| self.row_at(index))
    }

    /// Rows in bar order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = IndicatorRow> + '_ {
        (0..self.len()).map(|i| self.row_at(i))
    }

    fn row_at(&self, index: usize) -> IndicatorRow {
        IndicatorRow {
            ema_short: self.ema_short[index],
            ema_long: self.ema_long[index],
            macd_fast: self.macd_fast[index],
            macd_slow: self.macd_slow[index],
            rsi: self.rsi[index],
            macd: self.macd[index],
            macd_signal: self.macd_signal[index],
        }
    }

    #[must_use]
    pub fn ema_short(&self) -> &[Price] {
        &self.ema_short
    }

    #[must_use]
    pub fn ema_long(&self) -> &[Price] {
        &self.ema_long
    }

    #[must_use]
    pub fn macd_fast(&self) -> &[Price] {
        &self.macd_fast
    }

    #[must_use]
    pub fn macd_slow(&self) -> &[Price] {
        &self.macd_slow
    }

    #[must_use]
    pub fn rsi(&self) -> &[Option<Price>] {
        &self.rsi
    }

    #[must_use]
    pub fn macd(&self) -> &[Price] {
        &self.macd
    }

    #[must_use]
    pub fn macd_signal(&self) -> &[Price] {
        &self.macd_signal
    }
}

/// One [`Signal`] per bar, index-aligned with the price series.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct SignalSeries(Vec<Signal>);

impl SignalSeries {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Signal] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.0.iter()
    }

    /// Label of the most recent bar, the "current signal" of a chart.
    /// [`Signal::Neutral`] for an empty series.
    #[must_use]
    pub fn current(&self) -> Signal {
        self.0.last().copied().unwrap_or_default()
    }

    /// Indices of the bars labelled `signal`, e.g. for chart markers.
    pub fn markers(&self, signal: Signal) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(move |(i, &s)| (s == signal).then_some(i))
    }

    /// Number of bars labelled `signal`.
    #[must_use]
    pub fn count(&self, signal: Signal) -> usize {
        self.0.iter().filter(|&&s| s == signal).count()
    }
}

impl From<Vec<Signal>> for SignalSeries {
    fn from(signals: Vec<Signal>) -> Self {
        Self(signals)
    }
}

impl FromIterator<Signal> for SignalSeries {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for SignalSeries {
    type Output = Signal;

    fn index(&self, index: usize) -> &Signal {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a SignalSeries {
    type Item = &'a Signal;
    type IntoIter = std::slice::Iter<'a, Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
