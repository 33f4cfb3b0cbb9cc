use std::fmt::Display;

use crate::Price;

/// Weighting scheme of an exponential moving average.
///
/// Both schemes use `α = 2 / (length + 1)` and start at the first
/// observation, so `EMA[0] = price[0]` and the value is defined from the
/// first bar onward.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum Smoothing {
    /// Plain recurrence seeded with the first observation:
    ///
    /// ```text
    /// EMA[0] = price[0]
    /// EMA[t] = α × price[t] + (1 − α) × EMA[t − 1]
    /// ```
    #[default]
    Recursive,
    /// Bias-corrected weighted mean over every observation so far:
    ///
    /// ```text
    /// EMA[t] = Σ (1 − α)^i × price[t − i] / Σ (1 − α)^i,   i = 0..=t
    /// ```
    ///
    /// Early values lean less on the first observation than the recursive
    /// form; both converge as `t` grows.
    Adjusted,
}

impl Display for Smoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Exponential smoothing over raw values.
///
/// Shared by [`Ema`](crate::Ema) (close prices) and [`Macd`](crate::Macd)
/// (both component EMAs and the signal line over MACD values).
#[derive(Clone, Debug)]
pub(crate) enum ExpSmoother {
    Recursive {
        alpha: f64,
        current: Option<Price>,
    },
    Adjusted {
        decay: f64,
        weighted_sum: f64,
        weight: f64,
    },
}

impl ExpSmoother {
    pub(crate) fn new(length: usize, smoothing: Smoothing) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let alpha = 2.0 / (length + 1) as f64;

        match smoothing {
            Smoothing::Recursive => Self::Recursive {
                alpha,
                current: None,
            },
            Smoothing::Adjusted => Self::Adjusted {
                decay: 1.0 - alpha,
                weighted_sum: 0.0,
                weight: 0.0,
            },
        }
    }

    /// Folds the next value in and returns the smoothed value.
    #[inline]
    pub(crate) fn update(&mut self, value: Price) -> Price {
        match self {
            Self::Recursive { alpha, current } => {
                let next = match *current {
                    Some(previous) => alpha.mul_add(value - previous, previous),
                    None => value,
                };
                *current = Some(next);
                next
            }
            Self::Adjusted {
                decay,
                weighted_sum,
                weight,
            } => {
                *weighted_sum = weighted_sum.mul_add(*decay, value);
                *weight = weight.mul_add(*decay, 1.0);
                *weighted_sum / *weight
            }
        }
    }
}
