//! Indicator snapshot — the immutable input of one evaluation cycle.
//!
//! A snapshot maps each timeframe to the indicator values the gate consumes:
//! full-length EMA series per configured period, the latest ADX and RSI, and
//! a trailing volume window (most-recent-last). It is built fresh per cycle,
//! owned by exactly one evaluation, and never mutated after construction.

use crate::config::IndicatorConfig;
use crate::domain::{Candle, Timeframe};
use crate::indicators::{ema_series, latest_adx, latest_rsi};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator values for a single timeframe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeframeIndicators {
    /// EMA series keyed by period, each aligned index-for-index with the
    /// candle series it was computed from.
    pub ema: BTreeMap<usize, Vec<f64>>,
    /// Latest ADX value, if the series was long enough.
    pub adx: Option<f64>,
    /// Latest RSI value, if the series was long enough.
    pub rsi: Option<f64>,
    /// Trailing volume window, chronological, most-recent-last.
    pub volume: Vec<f64>,
}

/// Immutable multi-timeframe indicator snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// When the snapshot was assembled; cross timestamps are derived from it.
    pub as_of: DateTime<Utc>,
    frames: BTreeMap<Timeframe, TimeframeIndicators>,
}

impl IndicatorSnapshot {
    /// Empty snapshot; frames are added with [`IndicatorSnapshot::insert`].
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            frames: BTreeMap::new(),
        }
    }

    /// Compute a snapshot from raw candle series, one per timeframe.
    pub fn from_candles(
        as_of: DateTime<Utc>,
        candles: &BTreeMap<Timeframe, Vec<Candle>>,
        config: &IndicatorConfig,
    ) -> Self {
        let mut snapshot = Self::new(as_of);

        for (&tf, series) in candles {
            if series.is_empty() {
                continue;
            }
            let closes: Vec<f64> = series.iter().map(|c| c.close).collect();

            let mut ema = BTreeMap::new();
            for &period in &config.ema_periods {
                ema.insert(period, ema_series(&closes, period));
            }

            let volume_start = series.len().saturating_sub(config.volume_window);
            let volume = series[volume_start..].iter().map(|c| c.volume).collect();

            snapshot.insert(
                tf,
                TimeframeIndicators {
                    ema,
                    adx: latest_adx(series, config.di_period, config.adx_period),
                    rsi: latest_rsi(&closes, config.rsi_period),
                    volume,
                },
            );
        }

        snapshot
    }

    /// Add a precomputed frame (used by tests and external snapshot feeds).
    pub fn insert(&mut self, tf: Timeframe, frame: TimeframeIndicators) {
        self.frames.insert(tf, frame);
    }

    pub fn frame(&self, tf: Timeframe) -> Option<&TimeframeIndicators> {
        self.frames.get(&tf)
    }

    /// EMA series for a timeframe and period, if present.
    pub fn ema(&self, tf: Timeframe, period: usize) -> Option<&[f64]> {
        self.frames
            .get(&tf)
            .and_then(|f| f.ema.get(&period))
            .map(Vec::as_slice)
    }

    /// Latest ADX for a timeframe, if present.
    pub fn adx(&self, tf: Timeframe) -> Option<f64> {
        self.frames.get(&tf).and_then(|f| f.adx)
    }

    /// Latest RSI for a timeframe, if present.
    pub fn rsi(&self, tf: Timeframe) -> Option<f64> {
        self.frames.get(&tf).and_then(|f| f.rsi)
    }

    /// Trailing volume window for a timeframe, if present.
    pub fn volume(&self, tf: Timeframe) -> Option<&[f64]> {
        self.frames.get(&tf).map(|f| f.volume.as_slice())
    }

    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.frames.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn default_config() -> IndicatorConfig {
        IndicatorConfig::default()
    }

    #[test]
    fn ema_series_aligned_with_candles() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let mut candles = BTreeMap::new();
        candles.insert(Timeframe::M15, make_candles(&closes));

        let snapshot = IndicatorSnapshot::from_candles(as_of(), &candles, &default_config());
        for &period in &default_config().ema_periods {
            assert_eq!(
                snapshot.ema(Timeframe::M15, period).unwrap().len(),
                closes.len()
            );
        }
    }

    #[test]
    fn missing_timeframe_reads_none() {
        let snapshot = IndicatorSnapshot::new(as_of());
        assert!(snapshot.frame(Timeframe::M15).is_none());
        assert!(snapshot.ema(Timeframe::M15, 50).is_none());
        assert!(snapshot.adx(Timeframe::H1).is_none());
        assert!(snapshot.rsi(Timeframe::H1).is_none());
        assert!(snapshot.volume(Timeframe::M15).is_none());
    }

    #[test]
    fn short_series_leaves_adx_rsi_unset() {
        let mut candles = BTreeMap::new();
        candles.insert(Timeframe::M15, make_candles(&[100.0, 101.0, 102.0]));
        let snapshot = IndicatorSnapshot::from_candles(as_of(), &candles, &default_config());

        let frame = snapshot.frame(Timeframe::M15).unwrap();
        assert!(frame.adx.is_none());
        assert!(frame.rsi.is_none());
        assert_eq!(frame.volume.len(), 3);
    }

    #[test]
    fn volume_window_is_capped() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let mut candles = BTreeMap::new();
        candles.insert(Timeframe::M15, make_candles(&closes));

        let config = IndicatorConfig {
            volume_window: 10,
            ..IndicatorConfig::default()
        };
        let snapshot = IndicatorSnapshot::from_candles(as_of(), &candles, &config);
        assert_eq!(snapshot.volume(Timeframe::M15).unwrap().len(), 10);
    }

    #[test]
    fn empty_candle_series_is_skipped() {
        let mut candles = BTreeMap::new();
        candles.insert(Timeframe::M15, Vec::new());
        let snapshot = IndicatorSnapshot::from_candles(as_of(), &candles, &default_config());
        assert!(snapshot.frame(Timeframe::M15).is_none());
    }

    #[test]
    fn snapshot_serialization_roundtrip() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let mut candles = BTreeMap::new();
        candles.insert(Timeframe::M15, make_candles(&closes));
        let snapshot = IndicatorSnapshot::from_candles(as_of(), &candles, &default_config());

        let json = serde_json::to_string(&snapshot).unwrap();
        let deser: IndicatorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.as_of, snapshot.as_of);
        assert_eq!(
            deser.ema(Timeframe::M15, 50).unwrap(),
            snapshot.ema(Timeframe::M15, 50).unwrap()
        );
    }
}
