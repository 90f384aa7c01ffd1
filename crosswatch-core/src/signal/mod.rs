//! Signal fusion — four independent filters behind one all-must-pass gate.
//!
//! The gate runs in fixed order: EMA cross, trend alignment, ADX strength,
//! RSI momentum, volume surge. Every stage is a pure function of the
//! snapshot; the compositor short-circuits on the first failure and returns
//! nothing — absence is the normal negative outcome, not an error.

pub mod adx;
pub mod compositor;
pub mod cross;
pub mod rsi;
pub mod volume;

pub use adx::{classify_adx, AdxAssessment, AdxTier};
pub use compositor::{SignalCompositor, SignalRecord};
pub use cross::{find_recent_cross, CrossEvent, CrossScan};
pub use rsi::{classify_rsi, RsiAssessment, RsiStrength};
pub use volume::{analyze_volume, VolumeVerdict};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional intent of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => f.write_str("BULLISH"),
            Direction::Bearish => f.write_str("BEARISH"),
        }
    }
}

/// Post-cross trend of the slow EMA.
///
/// The label encodes the confirming direction relative to the cross, not raw
/// slope: a bearish cross labels `Falling` only when the second half-window
/// average is strictly below the first, and `Rising` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Rising,
    Falling,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Rising => f.write_str("rising"),
            TrendLabel::Falling => f.write_str("falling"),
        }
    }
}
