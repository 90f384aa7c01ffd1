//! EMA cross detection — backward scan for the most recent fast/slow cross.
//!
//! The scan starts at the newest candle pair and walks backward up to the
//! lookback limit, returning the first crossing it finds (recency priority).
//! When a cross is found, the slow-EMA sub-series from the cross to now is
//! split into two halves and their averages compared to label the post-cross
//! trend.

use super::{Direction, TrendLabel};
use crate::domain::Timeframe;
use crate::snapshot::IndicatorSnapshot;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The most recent EMA cross within the lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub direction: Direction,
    /// Steps back from the newest candle (1 = the newest pair crossed).
    pub candles_ago: usize,
    /// Age of the cross in hours.
    pub hours_ago: f64,
    /// Cross time, derived from the snapshot's `as_of`.
    pub occurred_at: DateTime<Utc>,
    /// Post-cross trend of the slow EMA (confirming-direction label).
    pub slow_trend: TrendLabel,
}

impl CrossEvent {
    /// Trend alignment: a bullish cross needs a rising slow EMA, a bearish
    /// cross a falling one. Any other combination invalidates the cycle.
    pub fn is_trend_aligned(&self) -> bool {
        matches!(
            (self.direction, self.slow_trend),
            (Direction::Bullish, TrendLabel::Rising) | (Direction::Bearish, TrendLabel::Falling)
        )
    }
}

/// Outcome of a cross scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrossScan {
    Cross(CrossEvent),
    /// No crossing inside the lookback window.
    NoCross,
    /// Fewer than two points, a missing series, or a fast/slow length
    /// mismatch. A malformed snapshot lands here instead of panicking.
    InsufficientData,
}

impl CrossScan {
    pub fn into_event(self) -> Option<CrossEvent> {
        match self {
            CrossScan::Cross(event) => Some(event),
            _ => None,
        }
    }
}

/// Scan one timeframe's fast/slow EMA pair backward for the most recent
/// cross within `lookback` candles.
pub fn find_recent_cross(
    snapshot: &IndicatorSnapshot,
    tf: Timeframe,
    fast_period: usize,
    slow_period: usize,
    lookback: usize,
) -> CrossScan {
    let (fast, slow) = match (snapshot.ema(tf, fast_period), snapshot.ema(tf, slow_period)) {
        (Some(fast), Some(slow)) => (fast, slow),
        _ => return CrossScan::InsufficientData,
    };

    let len = fast.len();
    if len < 2 || slow.len() != len {
        return CrossScan::InsufficientData;
    }

    let candle_hours = tf.hours();
    let max_lookback = lookback.min(len - 1);

    // i = 1 is the newest candle pair; walk backward and return the first hit.
    for i in 1..=max_lookback {
        let cur_fast = fast[len - i];
        let cur_slow = slow[len - i];
        let prev_fast = fast[len - i - 1];
        let prev_slow = slow[len - i - 1];

        let direction = if prev_fast <= prev_slow && cur_fast > cur_slow {
            Direction::Bullish
        } else if prev_fast >= prev_slow && cur_fast < cur_slow {
            Direction::Bearish
        } else {
            continue;
        };

        let slow_trend = slow_trend_since(&slow[len - i..], direction);
        let hours_ago = i as f64 * candle_hours;
        let occurred_at = snapshot.as_of
            - Duration::milliseconds((hours_ago * 3_600_000.0).round() as i64);

        return CrossScan::Cross(CrossEvent {
            direction,
            candles_ago: i,
            hours_ago,
            occurred_at,
            slow_trend,
        });
    }

    CrossScan::NoCross
}

/// Label the slow EMA's trend over the sub-series from the cross to now.
///
/// The sub-series is split at floor(len / 2); each half is averaged. For a
/// bullish cross the label is `Rising` when the second half strictly exceeds
/// the first. For a bearish cross the comparison inverts: `Falling` when the
/// second half is strictly below the first, `Rising` otherwise. The
/// asymmetry is deliberate (confirming direction, not raw slope).
fn slow_trend_since(since_cross: &[f64], direction: Direction) -> TrendLabel {
    let mid = since_cross.len() / 2;
    let first_half = &since_cross[..mid];
    let second_half = &since_cross[mid..];

    let first_avg = first_half.iter().sum::<f64>() / (mid.max(1)) as f64;
    let second_avg = second_half.iter().sum::<f64>() / (second_half.len().max(1)) as f64;

    match direction {
        Direction::Bullish => {
            if second_avg > first_avg {
                TrendLabel::Rising
            } else {
                TrendLabel::Falling
            }
        }
        Direction::Bearish => {
            if second_avg < first_avg {
                TrendLabel::Falling
            } else {
                TrendLabel::Rising
            }
        }
    }
}
