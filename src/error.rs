use crate::Timestamp;

/// Result alias for the batch pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a whole-series computation.
///
/// Undefined indicator values (RSI warm-up) are not errors: they are
/// `None` entries in the [`IndicatorSeries`](crate::IndicatorSeries) and
/// classify as [`Signal::Neutral`](crate::Signal::Neutral).
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The price series has no bars.
    #[error("price series is empty")]
    EmptyInput,

    /// Bar at `index` does not open strictly after its predecessor.
    #[error(
        "open_time must be strictly increasing: bar {index} opens at {current}, previous bar at {previous}"
    )]
    NonIncreasingTimestamp {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    /// Indicator rows are not aligned with the price series.
    #[error("indicator series has {indicators} rows, price series has {prices} bars")]
    LengthMismatch { prices: usize, indicators: usize },
}
