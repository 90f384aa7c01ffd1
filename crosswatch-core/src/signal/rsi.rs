//! RSI momentum classification across two confirmation timeframes.
//!
//! Direction comes from the fast timeframe relative to the midpoint; the
//! slow timeframe decides strong vs weak. The boundary behavior is exact:
//! the strong tiers require a strict inequality on both timeframes, while
//! the weak tiers use a non-strict comparison on the slow side, so a slow
//! RSI sitting exactly on the midpoint lands in the weak branch. A fast
//! value exactly on the midpoint classifies as nothing at all.

use super::Direction;
use crate::domain::Timeframe;
use crate::snapshot::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Momentum strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiStrength {
    Strong,
    Weak,
}

impl fmt::Display for RsiStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiStrength::Strong => f.write_str("strong"),
            RsiStrength::Weak => f.write_str("weak"),
        }
    }
}

/// RSI classification with the raw values carried as structured fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiAssessment {
    pub direction: Direction,
    pub strength: RsiStrength,
    pub fast_tf: Timeframe,
    pub slow_tf: Timeframe,
    pub fast_value: f64,
    pub slow_value: f64,
}

impl RsiAssessment {
    /// Warning for the weak tier; `None` for strong.
    pub fn warning(&self) -> Option<String> {
        match self.strength {
            RsiStrength::Strong => None,
            RsiStrength::Weak => Some(format!(
                "WARNING: RSI shows weak {} signal (RSI {} {:.2}, RSI {} {:.2})",
                match self.direction {
                    Direction::Bullish => "bullish",
                    Direction::Bearish => "bearish",
                },
                self.fast_tf,
                self.fast_value,
                self.slow_tf,
                self.slow_value
            )),
        }
    }
}

/// Classify momentum from the latest RSI of two timeframes.
///
/// Returns `None` when either value is absent, or when the two timeframes
/// give no coherent direction (fast exactly on the midpoint).
pub fn classify_rsi(
    snapshot: &IndicatorSnapshot,
    fast_tf: Timeframe,
    slow_tf: Timeframe,
    midpoint: f64,
) -> Option<RsiAssessment> {
    let fast_value = snapshot.rsi(fast_tf)?;
    let slow_value = snapshot.rsi(slow_tf)?;

    let (direction, strength) = if fast_value > midpoint && slow_value > midpoint {
        (Direction::Bullish, RsiStrength::Strong)
    } else if fast_value < midpoint && slow_value < midpoint {
        (Direction::Bearish, RsiStrength::Strong)
    } else if fast_value > midpoint && slow_value <= midpoint {
        (Direction::Bullish, RsiStrength::Weak)
    } else if fast_value < midpoint && slow_value >= midpoint {
        (Direction::Bearish, RsiStrength::Weak)
    } else {
        return None;
    };

    Some(RsiAssessment {
        direction,
        strength,
        fast_tf,
        slow_tf,
        fast_value,
        slow_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TimeframeIndicators;
    use chrono::TimeZone;

    fn snapshot_with(fast: Option<f64>, slow: Option<f64>) -> IndicatorSnapshot {
        let as_of = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let mut snapshot = IndicatorSnapshot::new(as_of);
        snapshot.insert(
            Timeframe::M15,
            TimeframeIndicators {
                rsi: fast,
                ..TimeframeIndicators::default()
            },
        );
        snapshot.insert(
            Timeframe::H1,
            TimeframeIndicators {
                rsi: slow,
                ..TimeframeIndicators::default()
            },
        );
        snapshot
    }

    fn classify(fast: Option<f64>, slow: Option<f64>) -> Option<RsiAssessment> {
        classify_rsi(
            &snapshot_with(fast, slow),
            Timeframe::M15,
            Timeframe::H1,
            50.0,
        )
    }

    #[test]
    fn both_above_is_strong_bullish() {
        let assessment = classify(Some(60.0), Some(55.0)).unwrap();
        assert_eq!(assessment.direction, Direction::Bullish);
        assert_eq!(assessment.strength, RsiStrength::Strong);
        assert!(assessment.warning().is_none());
    }

    #[test]
    fn both_below_is_strong_bearish() {
        let assessment = classify(Some(40.0), Some(45.0)).unwrap();
        assert_eq!(assessment.direction, Direction::Bearish);
        assert_eq!(assessment.strength, RsiStrength::Strong);
    }

    #[test]
    fn fast_above_slow_below_is_weak_bullish() {
        let assessment = classify(Some(60.0), Some(45.0)).unwrap();
        assert_eq!(assessment.direction, Direction::Bullish);
        assert_eq!(assessment.strength, RsiStrength::Weak);
        assert!(assessment.warning().unwrap().contains("weak bullish"));
    }

    #[test]
    fn fast_below_slow_above_is_weak_bearish() {
        let assessment = classify(Some(40.0), Some(55.0)).unwrap();
        assert_eq!(assessment.direction, Direction::Bearish);
        assert_eq!(assessment.strength, RsiStrength::Weak);
    }

    #[test]
    fn slow_exactly_on_midpoint_is_weak_not_strong() {
        // Non-strict comparison on the weak branch only.
        let bullish = classify(Some(60.0), Some(50.0)).unwrap();
        assert_eq!(bullish.strength, RsiStrength::Weak);
        let bearish = classify(Some(40.0), Some(50.0)).unwrap();
        assert_eq!(bearish.strength, RsiStrength::Weak);
    }

    #[test]
    fn fast_exactly_on_midpoint_is_no_result() {
        assert!(classify(Some(50.0), Some(60.0)).is_none());
        assert!(classify(Some(50.0), Some(40.0)).is_none());
        assert!(classify(Some(50.0), Some(50.0)).is_none());
    }

    #[test]
    fn missing_value_is_unavailable() {
        assert!(classify(None, Some(55.0)).is_none());
        assert!(classify(Some(55.0), None).is_none());
    }
}
