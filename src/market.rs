use std::{fmt::Display, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Invalid user-facing market option.
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown timeframe '{0}', expected one of 5m, 15m, 30m, 60m")]
    UnknownTimeframe(String),

    #[error("instrument symbol must not be empty")]
    EmptyInstrument,

    #[error("lookback of {days} days is outside 1..={max} for the {timeframe} timeframe")]
    LookbackOutOfRange {
        days: u32,
        max: u32,
        timeframe: Timeframe,
    },
}

/// Bar sampling interval offered to the user.
///
/// Serialized as the provider's interval code (`"5m"`, `"15m"`, `"30m"`,
/// `"60m"`); `"1h"` is accepted for `60m`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "60m", alias = "1h")]
    H1,
}

impl Timeframe {
    /// Every supported timeframe, shortest first.
    pub const ALL: [Self; 4] = [Self::M5, Self::M15, Self::M30, Self::H1];

    /// Provider interval code.
    #[must_use]
    pub fn interval(self) -> &'static str {
        match self {
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "60m",
        }
    }

    /// Human-readable name for a selection widget.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::M5 => "5 Minutes",
            Self::M15 => "15 Minutes",
            Self::M30 => "30 Minutes",
            Self::H1 => "1 Hour",
        }
    }

    /// Length of one bar.
    #[must_use]
    pub fn duration(self) -> Duration {
        let minutes = match self {
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
        };
        Duration::from_secs(minutes * 60)
    }

    /// Longest history, in days, the price provider serves at this
    /// interval. Sub-hour intraday bars are kept for 60 days, hourly bars
    /// for 730.
    #[must_use]
    pub fn max_lookback_days(self) -> u32 {
        match self {
            Self::M5 | Self::M15 | Self::M30 => 60,
            Self::H1 => 730,
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.interval())
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "30m" => Ok(Self::M30),
            "60m" | "1h" => Ok(Self::H1),
            other => Err(ConfigError::UnknownTimeframe(other.to_owned())),
        }
    }
}

/// Ticker symbol understood by the price provider, e.g. `EURUSD=X`.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instrument(String);

impl Instrument {
    /// Euro / US dollar spot.
    pub const EURUSD: &'static str = "EURUSD=X";

    /// Wraps a ticker symbol, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyInstrument`] if nothing is left after trimming.
    pub fn new(symbol: impl AsRef<str>) -> Result<Self, ConfigError> {
        let symbol = symbol.as_ref().trim();
        if symbol.is_empty() {
            return Err(ConfigError::EmptyInstrument);
        }
        Ok(Self(symbol.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self(Self::EURUSD.to_owned())
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Instrument {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Instrument {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Instrument> for String {
    fn from(value: Instrument) -> Self {
        value.0
    }
}

/// What to fetch: instrument, bar interval and how far back.
///
/// Missing fields take their defaults: `EURUSD=X`, `5m`, 7 days.
///
/// # Example
///
/// ```
/// use quantedge_signals::{MarketConfig, Timeframe};
///
/// let market: MarketConfig =
///     serde_json::from_str(r#"{"instrument": "XAUUSD=X", "timeframe": "15m"}"#).unwrap();
///
/// assert_eq!(market.instrument.as_str(), "XAUUSD=X");
/// assert_eq!(market.timeframe, Timeframe::M15);
/// assert_eq!(market.lookback_days, 7);
/// assert!(market.validate().is_ok());
/// ```
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub instrument: Instrument,
    pub timeframe: Timeframe,
    pub lookback_days: u32,
}

impl MarketConfig {
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

    #[must_use]
    pub fn new(instrument: Instrument, timeframe: Timeframe) -> Self {
        Self {
            instrument,
            timeframe,
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
        }
    }

    #[must_use]
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Checks the lookback against the provider limit of the timeframe.
    ///
    /// # Errors
    ///
    /// [`ConfigError::LookbackOutOfRange`] for zero days or more than
    /// [`Timeframe::max_lookback_days`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.timeframe.max_lookback_days();
        if (1..=max).contains(&self.lookback_days) {
            Ok(())
        } else {
            Err(ConfigError::LookbackOutOfRange {
                days: self.lookback_days,
                max,
                timeframe: self.timeframe,
            })
        }
    }

    /// Lookback window as a duration.
    #[must_use]
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(u64::from(self.lookback_days) * 24 * 60 * 60)
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self::new(Instrument::default(), Timeframe::default())
    }
}
