use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{IndicatorRow, Price};

/// Trade direction suggested for one bar.
///
/// Serializes as `"LONG"`, `"SHORT"` and `"NONE"`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// Close above the trend EMA, RSI above the midline, MACD above its
    /// signal line.
    Long,
    /// Close below the trend EMA, RSI below the midline, MACD below its
    /// signal line.
    Short,
    /// No signal (`"NONE"`): the conditions disagree, a value is
    /// undefined, or a comparison is tied.
    #[default]
    #[serde(rename = "NONE")]
    Neutral,
}

impl Signal {
    /// Classifies one bar from its close and indicator values.
    ///
    /// All comparisons are strict, so ties fall through to
    /// [`Signal::Neutral`]. An undefined RSI (warm-up) or a NaN anywhere
    /// also yields `Neutral`; the function is total and never panics.
    ///
    /// This rule has no memory. The first bar of a series is forced to
    /// `Neutral` by [`classify_signals`](crate::classify_signals), not here.
    #[must_use]
    pub fn classify(close: Price, row: &IndicatorRow, rsi_midline: Price) -> Self {
        let Some(rsi) = row.rsi else {
            return Self::Neutral;
        };

        if close > row.ema_long && rsi > rsi_midline && row.macd > row.macd_signal {
            Self::Long
        } else if close < row.ema_long && rsi < rsi_midline && row.macd < row.macd_signal {
            Self::Short
        } else {
            Self::Neutral
        }
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Neutral => "NONE",
        };
        f.write_str(label)
    }
}
