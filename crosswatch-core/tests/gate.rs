//! End-to-end gate tests: raw candles through the snapshot builder into the
//! compositor.

use chrono::{DateTime, Duration, TimeZone, Utc};
use crosswatch_core::config::{IndicatorConfig, SignalConfig};
use crosswatch_core::domain::{Candle, Timeframe};
use crosswatch_core::signal::Direction;
use crosswatch_core::snapshot::IndicatorSnapshot;
use crosswatch_core::SignalCompositor;
use std::collections::BTreeMap;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn candles(closes_and_volumes: &[(f64, f64)], step_minutes: i64) -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    closes_and_volumes
        .iter()
        .enumerate()
        .map(|(i, &(close, volume))| {
            let open = if i == 0 {
                close
            } else {
                closes_and_volumes[i - 1].0
            };
            Candle {
                open_time: base + Duration::minutes(step_minutes * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume,
            }
        })
        .collect()
}

/// Long decline (EMA50 well below EMA200), then a violent 8-candle rally
/// with a volume surge on the last 4 candles. The EMA50 crosses above the
/// EMA200 inside the rally, so the cross is at most 8 candles (2 hours) old.
fn rally_series() -> Vec<(f64, f64)> {
    let mut series: Vec<(f64, f64)> = (0..300).map(|i| (160.0 - 0.2 * i as f64, 600.0)).collect();
    let floor = series.last().unwrap().0;
    for j in 1..=8 {
        let volume = if j > 4 { 5000.0 } else { 600.0 };
        series.push((floor + 20.0 * j as f64, volume));
    }
    series
}

#[test]
fn rally_with_volume_surge_fires_bullish() {
    let mut frames = BTreeMap::new();
    frames.insert(Timeframe::M15, candles(&rally_series(), 15));
    frames.insert(Timeframe::H1, candles(&rally_series(), 60));

    let snapshot = IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());
    let compositor = SignalCompositor::new(SignalConfig::default());

    let record = compositor.evaluate(&snapshot).unwrap();
    assert_eq!(record.direction, Direction::Bullish);
    assert!(record.cross.candles_ago >= 1 && record.cross.candles_ago <= 8);
    assert_eq!(record.cross.hours_ago, record.cross.candles_ago as f64 * 0.25);
    assert_eq!(
        record.cross.occurred_at,
        as_of() - Duration::minutes(15 * record.cross.candles_ago as i64)
    );
    assert!(record.volume.combined_pass);
    // The classifiers saw real computed values, not placeholders.
    assert!(record.rsi.fast_value > 50.0);
    assert!(record.adx.fast_value >= 0.0);
}

#[test]
fn rally_without_volume_surge_stays_silent() {
    let series: Vec<(f64, f64)> = rally_series()
        .into_iter()
        .map(|(close, _)| (close, 600.0))
        .collect();
    let mut frames = BTreeMap::new();
    frames.insert(Timeframe::M15, candles(&series, 15));
    frames.insert(Timeframe::H1, candles(&series, 60));

    let snapshot = IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());
    assert!(SignalCompositor::new(SignalConfig::default())
        .evaluate(&snapshot)
        .is_none());
}

#[test]
fn flat_market_stays_silent() {
    let series = vec![(100.0, 600.0); 260];
    let mut frames = BTreeMap::new();
    frames.insert(Timeframe::M15, candles(&series, 15));
    frames.insert(Timeframe::H1, candles(&series, 60));

    let snapshot = IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());
    assert!(SignalCompositor::new(SignalConfig::default())
        .evaluate(&snapshot)
        .is_none());
}

#[test]
fn missing_confirmation_timeframe_stays_silent() {
    let mut frames = BTreeMap::new();
    frames.insert(Timeframe::M15, candles(&rally_series(), 15));
    // No 1h data at all: ADX classification is unavailable.

    let snapshot = IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());
    assert!(SignalCompositor::new(SignalConfig::default())
        .evaluate(&snapshot)
        .is_none());
}

#[test]
fn tiny_series_never_panics() {
    for n in 0..6 {
        let series = vec![(100.0, 600.0); n];
        let mut frames = BTreeMap::new();
        frames.insert(Timeframe::M15, candles(&series, 15));
        frames.insert(Timeframe::H1, candles(&series, 60));

        let snapshot =
            IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());
        assert!(SignalCompositor::new(SignalConfig::default())
            .evaluate(&snapshot)
            .is_none());
    }
}

#[test]
fn evaluations_share_no_state_across_snapshots() {
    let mut frames = BTreeMap::new();
    frames.insert(Timeframe::M15, candles(&rally_series(), 15));
    frames.insert(Timeframe::H1, candles(&rally_series(), 60));
    let snapshot = IndicatorSnapshot::from_candles(as_of(), &frames, &IndicatorConfig::default());

    let compositor = SignalCompositor::new(SignalConfig::default());
    let first = compositor.evaluate(&snapshot);
    // An unrelated evaluation in between must not disturb the next one.
    let empty = IndicatorSnapshot::new(as_of());
    assert!(compositor.evaluate(&empty).is_none());
    let second = compositor.evaluate(&snapshot);
    assert_eq!(first, second);
}
