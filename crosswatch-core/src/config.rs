//! Immutable configuration for snapshot construction and signal evaluation.
//!
//! Every threshold the gate consults lives here, not in ambient constants, so
//! evaluations are deterministic functions of (snapshot, config).

use crate::domain::Timeframe;
use serde::{Deserialize, Serialize};

/// Parameters for the signal fusion gate.
///
/// Defaults mirror the production scanner settings: EMA 50/200 cross on 15m
/// with a 96-candle lookback (48 hours of 15m candles), ADX/RSI confirmation
/// on 15m + 1h, and the adaptive volume surge test on the 15m window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Fast EMA period for cross detection.
    pub ema_fast: usize,
    /// Slow EMA period for cross detection.
    pub ema_slow: usize,
    /// Timeframe scanned for the EMA cross and the volume surge.
    pub cross_timeframe: Timeframe,
    /// How many candles back the cross scan walks.
    pub cross_lookback: usize,
    /// Crosses older than this many hours are discarded as stale.
    pub max_cross_age_hours: f64,

    /// Fast confirmation timeframe for ADX and RSI.
    pub confirm_fast: Timeframe,
    /// Slow confirmation timeframe for ADX and RSI.
    pub confirm_slow: Timeframe,
    /// ADX trend-strength threshold.
    pub adx_threshold: f64,
    /// RSI bullish/bearish midpoint.
    pub rsi_midpoint: f64,

    /// Volume lookback window defining "normal" behaviour.
    pub volume_lookback: usize,
    /// Most recent candles treated as the surge zone.
    pub surge_len: usize,
    /// Base multiplier for the adaptive absolute-strength threshold.
    pub base_multiplier: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ema_fast: 50,
            ema_slow: 200,
            cross_timeframe: Timeframe::M15,
            cross_lookback: 96,
            max_cross_age_hours: 48.0,
            confirm_fast: Timeframe::M15,
            confirm_slow: Timeframe::H1,
            adx_threshold: 25.0,
            rsi_midpoint: 50.0,
            volume_lookback: 10,
            surge_len: 4,
            base_multiplier: 1.35,
        }
    }
}

impl SignalConfig {
    /// Timeframes a snapshot must carry for this configuration.
    pub fn required_timeframes(&self) -> Vec<Timeframe> {
        let mut tfs = vec![
            self.cross_timeframe,
            self.confirm_fast,
            self.confirm_slow,
        ];
        tfs.sort();
        tfs.dedup();
        tfs
    }
}

/// Parameters for computing indicator series from raw candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// EMA periods computed per timeframe.
    pub ema_periods: Vec<usize>,
    /// RSI averaging period.
    pub rsi_period: usize,
    /// Directional-movement smoothing period.
    pub di_period: usize,
    /// ADX smoothing period.
    pub adx_period: usize,
    /// Trailing volume samples kept in the snapshot.
    pub volume_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_periods: vec![7, 25, 50, 99, 200],
            rsi_period: 14,
            di_period: 14,
            adx_period: 14,
            volume_window: 500,
        }
    }
}
