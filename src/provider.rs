use tracing::{debug, warn};

use crate::{ConfigError, Error, Evaluation, MarketConfig, Ohlcv, SignalConfig, engine};

/// Source of historical bars for a market, e.g. a quotes HTTP API.
///
/// Implementations return bars in ascending `open_time` order. An empty
/// vector means the provider had nothing for the request.
pub trait PriceProvider {
    type Bar: Ohlcv;
    type Error;

    /// Fetches the bars covering `market.lookback_days` at
    /// `market.timeframe`.
    ///
    /// # Errors
    ///
    /// Whatever the provider fails with.
    fn fetch(&self, market: &MarketConfig) -> Result<Vec<Self::Bar>, Self::Error>;
}

/// Failure of [`evaluate_market`].
#[derive(PartialEq, Debug, thiserror::Error)]
pub enum MarketError<E> {
    #[error("invalid market options: {0}")]
    Config(#[from] ConfigError),

    #[error("price provider failed: {0}")]
    Provider(#[source] E),

    #[error("signal evaluation failed: {0}")]
    Signal(#[from] Error),
}

/// Fetches `market` from `provider` and evaluates it.
///
/// Returns `Ok(None)` when the provider has no bars, so callers can
/// report "no data" instead of failing.
///
/// # Errors
///
/// [`MarketError::Config`] if `market` fails [`MarketConfig::validate`],
/// [`MarketError::Provider`] if the fetch fails, [`MarketError::Signal`]
/// if the bars are not strictly ordered in time.
pub fn evaluate_market<P: PriceProvider>(
    provider: &P,
    market: &MarketConfig,
    config: &SignalConfig,
) -> Result<Option<Evaluation>, MarketError<P::Error>> {
    market.validate()?;

    let bars = provider.fetch(market).map_err(MarketError::Provider)?;
    if bars.is_empty() {
        warn!(
            instrument = %market.instrument,
            timeframe = %market.timeframe,
            lookback_days = market.lookback_days,
            "provider returned no bars"
        );
        return Ok(None);
    }

    debug!(
        instrument = %market.instrument,
        timeframe = %market.timeframe,
        bars = bars.len(),
        "fetched bars"
    );

    Ok(Some(engine::evaluate(&bars, config)?))
}
