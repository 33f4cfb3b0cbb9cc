#![allow(dead_code)]

use quantedge_signals::{Ohlcv, Price, Signal, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// EUR/USD 15-minute bar parsed from CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

/// Independently computed indicator values and label for one bar.
///
/// EMAs are seeded with the first close; `ema20_adjusted` is the
/// bias-corrected weighted mean. `rsi14` is empty during warm-up.
#[derive(Debug, Deserialize)]
pub struct RefRow {
    pub open_time: u64,
    pub ema20: f64,
    pub ema20_adjusted: f64,
    pub ema50: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub rsi14: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub signal: Signal,
}

const OHLCV_PATH: &str = "tests/fixtures/data/eurusd-15m.csv";
const REFERENCE_PATH: &str = "tests/fixtures/data/eurusd-15m-reference.csv";

/// Bars 169..190 share one close. From bar 183 the whole RSI(14) window
/// of deltas is flat.
pub const FLAT_RSI_BARS: std::ops::Range<usize> = 183..190;

/// Load the EUR/USD bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load the reference row of every bar.
pub fn load_reference_rows() -> Vec<RefRow> {
    load_records(REFERENCE_PATH, "invalid reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert two optional values are both undefined or within tolerance.
pub fn assert_near_opt(actual: Option<f64>, expected: Option<f64>, tolerance: f64, context: &str) {
    match (actual, expected) {
        (None, None) => {}
        (Some(a), Some(e)) => assert_near(a, e, tolerance, context),
        (a, e) => panic!("{context}: definedness mismatch, expected {e:?}, got {a:?}"),
    }
}

/// Generate a reference test for a single-value streaming indicator.
///
/// Usage: `reference_test!(ema_20, Ema, EmaConfig::close(nz(20)), |r| Some(r.ema20), 1e-9);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $column:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use quantedge_signals::*;
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_reference_rows();
                assert_eq!(bars.len(), reference.len());

                let column: fn(&RefRow) -> Option<f64> = $column;
                let mut ind = <$ind>::new($config);

                for (i, (bar, expected)) in bars.iter().zip(&reference).enumerate() {
                    assert_eq!(bar.open_time, expected.open_time);
                    let value = ind.compute(bar);
                    assert_near_opt(
                        value,
                        column(expected),
                        $tolerance,
                        &format!("{} at bar {i} (t={})", stringify!($name), bar.open_time),
                    );
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
