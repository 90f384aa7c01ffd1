//! Volume surge analysis — two independent filters, both required.
//!
//! Filter A (adaptive absolute strength) compares the surge-window average
//! against an EMA(10) baseline scaled by a volatility-adjusted multiplier.
//! Filter B (relative expansion) compares the surge-window average against
//! the historical window average and is independent of the configured base
//! multiplier. Every intermediate statistic is surfaced for observability.

use crate::domain::Timeframe;
use crate::indicators::ema::ema_latest;
use crate::snapshot::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

/// Smoothing period of the volume baseline.
const BASELINE_PERIOD: usize = 10;
/// Extra samples required beyond the surge window.
const MIN_EXTRA_SAMPLES: usize = 5;
/// How strongly volatility widens the adaptive multiplier.
const VOLATILITY_SCALE: f64 = 3.0;
/// Bounds of the adaptive multiplier.
const MULTIPLIER_FLOOR: f64 = 1.20;
const MULTIPLIER_CAP: f64 = 1.5;
/// Fixed relative-expansion threshold for Filter B.
const SPIKE_RATIO_MIN: f64 = 1.30;

/// Full statistics of a completed volume analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    pub filter_a_pass: bool,
    pub filter_b_pass: bool,
    pub combined_pass: bool,
    /// Mean volume over the surge window.
    pub recent_avg: f64,
    /// Mean volume over the historical (pre-surge) window.
    pub historical_avg: f64,
    /// EMA(10) baseline over the most recent samples.
    pub baseline: f64,
    /// Population stdev of the historical window over its mean.
    pub volatility: f64,
    /// Volatility-adjusted multiplier, clamped to [1.20, 1.5].
    pub multiplier: f64,
    /// Filter A threshold: baseline * multiplier.
    pub threshold: f64,
    /// Filter B ratio: recent_avg / max(historical_avg, 1).
    pub spike_ratio: f64,
    pub surge_len: usize,
}

impl VolumeReport {
    /// Human-readable explanation of both filters.
    pub fn explanation(&self) -> String {
        format!(
            "Volume Analysis Report\n\
             ---------------------------------\n\
             Recent Avg Volume (last {}): {:.2}\n\
             Historical Avg Volume: {:.2}\n\
             EMA10 Volume Baseline: {:.2}\n\
             Volume Volatility: {:.3}\n\
             Dynamic Multiplier: {:.2}\n\
             Filter A Threshold: {:.2}\n\
             \n\
             FILTER A - Absolute Strength Check\n\
             Result: {}\n\
             \n\
             FILTER B - Relative Expansion Check\n\
             Spike Ratio: {:.2}\n\
             Result: {}\n\
             \n\
             FINAL VOLUME SIGNAL: {}",
            self.surge_len,
            self.recent_avg,
            self.historical_avg,
            self.baseline,
            self.volatility,
            self.multiplier,
            self.threshold,
            if self.filter_a_pass { "PASS" } else { "FAIL" },
            self.spike_ratio,
            if self.filter_b_pass { "PASS" } else { "FAIL" },
            if self.combined_pass {
                "VALID SURGE"
            } else {
                "NO SURGE"
            },
        )
    }
}

/// Outcome of the volume surge analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VolumeVerdict {
    /// Fewer than `surge_len + 5` samples (or no volume window at all).
    InsufficientData { samples: usize, required: usize },
    Report(VolumeReport),
}

impl VolumeVerdict {
    pub fn combined_pass(&self) -> bool {
        match self {
            VolumeVerdict::InsufficientData { .. } => false,
            VolumeVerdict::Report(report) => report.combined_pass,
        }
    }

    pub fn report(&self) -> Option<&VolumeReport> {
        match self {
            VolumeVerdict::Report(report) => Some(report),
            VolumeVerdict::InsufficientData { .. } => None,
        }
    }

    pub fn explanation(&self) -> String {
        match self {
            VolumeVerdict::InsufficientData { samples, required } => format!(
                "Not enough candles to evaluate volume ({samples} of {required} required)."
            ),
            VolumeVerdict::Report(report) => report.explanation(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn stdev(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Run the dual-filter surge test on one timeframe's volume window.
pub fn analyze_volume(
    snapshot: &IndicatorSnapshot,
    tf: Timeframe,
    lookback: usize,
    surge_len: usize,
    base_multiplier: f64,
) -> VolumeVerdict {
    let required = surge_len + MIN_EXTRA_SAMPLES;
    let vols = match snapshot.volume(tf) {
        Some(vols) => vols,
        None => {
            return VolumeVerdict::InsufficientData {
                samples: 0,
                required,
            }
        }
    };

    let n = vols.len();
    if n < required {
        return VolumeVerdict::InsufficientData {
            samples: n,
            required,
        };
    }

    // Surge zone: the most recent candles under evaluation.
    let recent = &vols[n - surge_len..];
    let recent_avg = mean(recent);

    // Lookback window defines normal behaviour; the surge candles are
    // excluded from the historical window so they cannot inflate their own
    // baseline.
    let look = if n >= lookback {
        &vols[n - lookback..]
    } else {
        &vols[..n - surge_len]
    };
    let prev = if look.len() > surge_len {
        &look[..look.len() - surge_len]
    } else {
        look
    };
    let historical_avg = mean(prev);

    let baseline = ema_latest(&vols[n.saturating_sub(BASELINE_PERIOD)..], BASELINE_PERIOD);

    let volatility = stdev(prev) / historical_avg.max(1.0);
    let multiplier = (base_multiplier + volatility * VOLATILITY_SCALE)
        .min(MULTIPLIER_CAP)
        .max(MULTIPLIER_FLOOR);
    let threshold = baseline * multiplier;

    let filter_a_pass = recent_avg > threshold;

    let spike_ratio = recent_avg / historical_avg.max(1.0);
    let filter_b_pass = spike_ratio > SPIKE_RATIO_MIN;

    VolumeVerdict::Report(VolumeReport {
        filter_a_pass,
        filter_b_pass,
        combined_pass: filter_a_pass && filter_b_pass,
        recent_avg,
        historical_avg,
        baseline,
        volatility,
        multiplier,
        threshold,
        spike_ratio,
        surge_len,
    })
}
