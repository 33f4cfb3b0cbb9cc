mod fixtures;

use fixtures::{
    FLAT_RSI_BARS, assert_near, assert_near_opt, load_reference_ohlcvs, load_reference_rows,
    reference_test,
};
use quantedge_signals::{
    FLAT_MARKET_RSI, IndicatorConfig, IndicatorConfigBuilder, Macd, MacdConfig, SignalConfig,
    Smoothing, compute_indicators, compute_indicators_with,
};

/// Tolerance: 1e-9 (a hundredth of a pip on EUR/USD).
/// The reference is computed independently with the same recurrences,
/// so any drift is f64 rounding, not algorithmic divergence.
const TOLERANCE: f64 = 1e-9;

reference_test!(ema_20, Ema, EmaConfig::close(nz(20)), |r| Some(r.ema20), 1e-9);
reference_test!(ema_50, Ema, EmaConfig::close(nz(50)), |r| Some(r.ema50), 1e-9);
reference_test!(ema_12, Ema, EmaConfig::close(nz(12)), |r| Some(r.ema12), 1e-9);
reference_test!(ema_26, Ema, EmaConfig::close(nz(26)), |r| Some(r.ema26), 1e-9);
reference_test!(
    ema_20_adjusted,
    Ema,
    EmaConfig::adjusted(nz(20)),
    |r| Some(r.ema20_adjusted),
    1e-9
);
reference_test!(rsi_14, Rsi, RsiConfig::close(nz(14)), |r| r.rsi14, 1e-9);

#[test]
fn macd_12_26_9_matches_reference() {
    let bars = load_reference_ohlcvs();
    let reference = load_reference_rows();
    let mut macd = Macd::new(MacdConfig::default());

    for (i, (bar, expected)) in bars.iter().zip(&reference).enumerate() {
        let value = macd
            .compute(bar)
            .unwrap_or_else(|| panic!("MACD returned None at t={}", bar.open_time));
        assert_near(value.macd(), expected.macd, TOLERANCE, &format!("MACD at bar {i}"));
        assert_near(
            value.signal(),
            expected.macd_signal,
            TOLERANCE,
            &format!("MACD signal at bar {i}"),
        );
        assert_near(
            value.histogram(),
            expected.macd - expected.macd_signal,
            TOLERANCE,
            &format!("MACD histogram at bar {i}"),
        );
    }
}

#[test]
fn batch_matches_reference() {
    let bars = load_reference_ohlcvs();
    let reference = load_reference_rows();
    let indicators = compute_indicators(&bars).unwrap();

    assert_eq!(indicators.len(), bars.len());
    for (i, (row, expected)) in indicators.rows().zip(&reference).enumerate() {
        let ctx = |name: &str| format!("{name} at bar {i} (t={})", expected.open_time);
        assert_near(row.ema_short, expected.ema20, TOLERANCE, &ctx("EMA(20)"));
        assert_near(row.ema_long, expected.ema50, TOLERANCE, &ctx("EMA(50)"));
        assert_near(row.macd_fast, expected.ema12, TOLERANCE, &ctx("EMA(12)"));
        assert_near(row.macd_slow, expected.ema26, TOLERANCE, &ctx("EMA(26)"));
        assert_near_opt(row.rsi, expected.rsi14, TOLERANCE, &ctx("RSI(14)"));
        assert_near(row.macd, expected.macd, TOLERANCE, &ctx("MACD"));
        assert_near(row.macd_signal, expected.macd_signal, TOLERANCE, &ctx("MACD signal"));
    }
}

#[test]
fn batch_adjusted_smoothing_matches_reference() {
    let bars = load_reference_ohlcvs();
    let reference = load_reference_rows();
    let config = SignalConfig::builder()
        .smoothing(Smoothing::Adjusted)
        .build();
    let indicators = compute_indicators_with(&bars, &config).unwrap();

    for (i, (&value, expected)) in indicators.ema_short().iter().zip(&reference).enumerate() {
        assert_near(
            value,
            expected.ema20_adjusted,
            TOLERANCE,
            &format!("adjusted EMA(20) at bar {i}"),
        );
    }
}

#[test]
fn rsi_warm_up_is_fourteen_bars() {
    let bars = load_reference_ohlcvs();
    let indicators = compute_indicators(&bars).unwrap();
    let rsi = indicators.rsi();

    assert!(rsi[..14].iter().all(Option::is_none));
    assert!(rsi[14..].iter().all(Option::is_some));
    assert_eq!(SignalConfig::default().required_bars(), 15);
}

#[test]
fn rsi_is_bounded() {
    let bars = load_reference_ohlcvs();
    let indicators = compute_indicators(&bars).unwrap();

    for (i, rsi) in indicators.rsi().iter().enumerate() {
        if let Some(rsi) = *rsi {
            assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range at bar {i}");
        }
    }
}

#[test]
#[allow(clippy::float_cmp)]
fn flat_stretch_gives_neutral_rsi() {
    let bars = load_reference_ohlcvs();
    let indicators = compute_indicators(&bars).unwrap();

    for i in FLAT_RSI_BARS {
        assert_eq!(indicators.rsi()[i], Some(FLAT_MARKET_RSI), "bar {i}");
    }
}
