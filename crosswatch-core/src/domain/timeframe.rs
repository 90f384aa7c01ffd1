//! Timeframe — the supported candle intervals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Candle interval, ordered from shortest to longest.
///
/// Snapshots are keyed by timeframe; configuration names them by their
/// exchange label ("15m", "1h", ...). The set is closed: an unknown label is
/// a configuration error, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    /// Duration of one candle in hours.
    pub fn hours(self) -> f64 {
        match self {
            Timeframe::M1 => 1.0 / 60.0,
            Timeframe::M5 => 5.0 / 60.0,
            Timeframe::M15 => 0.25,
            Timeframe::M30 => 0.5,
            Timeframe::H1 => 1.0,
            Timeframe::H2 => 2.0,
            Timeframe::H4 => 4.0,
            Timeframe::H6 => 6.0,
            Timeframe::H12 => 12.0,
            Timeframe::D1 => 24.0,
        }
    }

    /// Exchange-style label ("15m", "1h", ...).
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::H6 => "6h",
            Timeframe::H12 => "12h",
            Timeframe::D1 => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing a timeframe label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown timeframe label '{0}'")]
pub struct ParseTimeframeError(pub String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "30m" => Ok(Timeframe::M30),
            "1h" => Ok(Timeframe::H1),
            "2h" => Ok(Timeframe::H2),
            "4h" => Ok(Timeframe::H4),
            "6h" => Ok(Timeframe::H6),
            "12h" => Ok(Timeframe::H12),
            "1d" => Ok(Timeframe::D1),
            other => Err(ParseTimeframeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_roundtrip() {
        for tf in [
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::H2,
            Timeframe::H4,
            Timeframe::H6,
            Timeframe::H12,
            Timeframe::D1,
        ] {
            assert_eq!(tf.label().parse::<Timeframe>(), Ok(tf));
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        assert!("3m".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
    }

    #[test]
    fn candle_hours() {
        assert_eq!(Timeframe::M15.hours(), 0.25);
        assert_eq!(Timeframe::H1.hours(), 1.0);
        assert_eq!(Timeframe::D1.hours(), 24.0);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Timeframe::M15).unwrap();
        assert_eq!(json, "\"15m\"");
        let tf: Timeframe = serde_json::from_str("\"1h\"").unwrap();
        assert_eq!(tf, Timeframe::H1);
    }

    #[test]
    fn ordered_by_duration() {
        assert!(Timeframe::M15 < Timeframe::H1);
        assert!(Timeframe::H1 < Timeframe::D1);
    }
}
