use crate::Price;
use std::collections::VecDeque;

/// Fixed-size trailing window of non-negative values.
///
/// Feeds RSI with the simple mean of the last `size` gains (or losses).
/// The sum is taken over the window contents on every push, so it never
/// carries rounding residue from evicted values: it is exactly zero for a
/// window of zeros and never negative.
#[derive(Clone, Debug)]
pub(crate) struct RollingWindow {
    size: usize,
    window: VecDeque<Price>,
    sum: Price,
    size_reciprocal: f64,
}

impl RollingWindow {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: 0.0,
            #[allow(clippy::cast_precision_loss)]
            size_reciprocal: 1.0 / size as f64,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Price) {
        debug_assert!(value >= 0.0, "window values must be non-negative: {value}");

        if self.is_ready() {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.sum = self.window.iter().sum();
    }

    /// Mean of the window, `None` until `size` values have been pushed.
    #[inline]
    pub(crate) fn mean(&self) -> Option<Price> {
        self.is_ready().then_some(self.sum * self.size_reciprocal)
    }

    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    mod filling {
        use super::*;

        #[test]
        fn mean_is_none_when_empty() {
            let w = RollingWindow::new(3);
            assert_eq!(w.mean(), None);
        }

        #[test]
        fn mean_is_none_until_full() {
            let mut w = RollingWindow::new(3);
            w.push(1.0);
            assert_eq!(w.mean(), None);
            w.push(2.0);
            assert_eq!(w.mean(), None);
        }

        #[test]
        fn mean_when_full() {
            let mut w = RollingWindow::new(2);
            w.push(1.0);
            w.push(3.0);
            assert_eq!(w.mean(), Some(2.0));
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn oldest_value_drops() {
            let mut w = RollingWindow::new(2);
            w.push(1.0);
            w.push(3.0);
            w.push(5.0);
            // (3 + 5) / 2
            assert_eq!(w.mean(), Some(4.0));
        }

        #[test]
        fn size_one_tracks_latest() {
            let mut w = RollingWindow::new(1);
            w.push(7.0);
            assert_eq!(w.mean(), Some(7.0));
            w.push(2.0);
            assert_eq!(w.mean(), Some(2.0));
        }

        #[test]
        fn fractional_values() {
            let mut w = RollingWindow::new(3);
            for v in [0.00012, 0.00031, 0.00007, 0.00044] {
                w.push(v);
            }
            let expected = (0.00031 + 0.00007 + 0.00044) / 3.0;
            assert!((w.mean().unwrap() - expected).abs() < 1e-17);
        }
    }

    mod exact_sum {
        use super::*;

        #[test]
        fn zero_after_positives_leave() {
            let mut w = RollingWindow::new(3);
            for v in [0.1, 0.2, 0.7] {
                w.push(v);
            }
            for _ in 0..3 {
                w.push(0.0);
            }
            assert_eq!(w.mean(), Some(0.0));
        }

        #[test]
        fn single_positive_survives_zeros() {
            let mut w = RollingWindow::new(3);
            for v in [0.1, 0.0, 0.0, 0.0, 0.2] {
                w.push(v);
            }
            assert_approx!(w.mean().unwrap(), 0.2 / 3.0);
        }

        #[test]
        fn tiny_value_after_large_ones_is_kept() {
            let mut w = RollingWindow::new(3);
            for i in 0..10_000 {
                w.push(f64::from(i % 7) * 13.37);
            }
            let tiny = 2000.0 * f64::EPSILON;
            for v in [0.0, 0.0, tiny] {
                w.push(v);
            }
            assert_eq!(w.mean(), Some(tiny * (1.0 / 3.0)));
        }
    }
}
