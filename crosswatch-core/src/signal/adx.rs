//! ADX strength classification across two confirmation timeframes.
//!
//! Three tiers: strong (both above threshold), weak (fast above, slow at or
//! below), very weak (fast at or below, regardless of slow). Weak tiers
//! attach a warning but never fail the gate on their own; a missing value
//! makes classification unavailable, which does.

use crate::domain::Timeframe;
use crate::snapshot::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trend-strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdxTier {
    Strong,
    Weak,
    VeryWeak,
}

impl fmt::Display for AdxTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdxTier::Strong => f.write_str("strong"),
            AdxTier::Weak => f.write_str("weak"),
            AdxTier::VeryWeak => f.write_str("very weak"),
        }
    }
}

/// ADX classification with the raw values carried as structured fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdxAssessment {
    pub tier: AdxTier,
    pub fast_tf: Timeframe,
    pub slow_tf: Timeframe,
    pub fast_value: f64,
    pub slow_value: f64,
    pub threshold: f64,
}

impl AdxAssessment {
    /// Warning for the weak tiers; `None` for strong.
    pub fn warning(&self) -> Option<String> {
        match self.tier {
            AdxTier::Strong => None,
            AdxTier::Weak => Some(format!(
                "WARNING: Weak trend - monitor closely (ADX {} {:.2} above {:.0}, ADX {} {:.2} below)",
                self.fast_tf, self.fast_value, self.threshold, self.slow_tf, self.slow_value
            )),
            AdxTier::VeryWeak => Some(format!(
                "WARNING: Very weak trend - proceed with caution (ADX {} {:.2} at or below {:.0})",
                self.fast_tf, self.fast_value, self.threshold
            )),
        }
    }
}

/// Classify trend strength from the latest ADX of two timeframes.
///
/// Returns `None` when either value is absent from the snapshot.
pub fn classify_adx(
    snapshot: &IndicatorSnapshot,
    fast_tf: Timeframe,
    slow_tf: Timeframe,
    threshold: f64,
) -> Option<AdxAssessment> {
    let fast_value = snapshot.adx(fast_tf)?;
    let slow_value = snapshot.adx(slow_tf)?;

    let tier = if fast_value > threshold && slow_value > threshold {
        AdxTier::Strong
    } else if fast_value > threshold {
        AdxTier::Weak
    } else {
        AdxTier::VeryWeak
    };

    Some(AdxAssessment {
        tier,
        fast_tf,
        slow_tf,
        fast_value,
        slow_value,
        threshold,
    })
}
