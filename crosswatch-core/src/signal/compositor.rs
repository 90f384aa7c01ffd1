//! Signal compositor — the all-must-pass gate.
//!
//! Five stages in fixed order: cross detection (with stale-cross cutoff),
//! trend alignment, ADX classification, RSI confirmation, volume surge.
//! The first failing stage terminates the evaluation with no signal. Weak
//! ADX/RSI tiers continue but attach warnings, ADX first, then RSI.

use super::adx::{classify_adx, AdxAssessment};
use super::cross::{find_recent_cross, CrossEvent, CrossScan};
use super::rsi::{classify_rsi, RsiAssessment};
use super::volume::{analyze_volume, VolumeReport, VolumeVerdict};
use super::{Direction, TrendLabel};
use crate::config::SignalConfig;
use crate::snapshot::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

/// The terminal artifact of a passing evaluation.
///
/// Created only when every gate stage passes; immutable once returned. All
/// numeric detail the stages produced travels as structured fields, so
/// downstream consumers never parse it back out of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub direction: Direction,
    pub cross: CrossEvent,
    pub slow_trend: TrendLabel,
    pub adx: AdxAssessment,
    pub rsi: RsiAssessment,
    pub volume: VolumeReport,
    /// Accumulated warnings: ADX first if present, then RSI.
    pub warnings: Vec<String>,
}

/// Runs the gate against one snapshot per call.
///
/// Stateless between evaluations: a new snapshot must be fetched for the
/// next cycle. Never panics; a malformed snapshot fails the stage that
/// consumes it.
#[derive(Debug, Clone)]
pub struct SignalCompositor {
    config: SignalConfig,
}

impl SignalCompositor {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Evaluate one snapshot. `None` is the normal negative outcome.
    pub fn evaluate(&self, snapshot: &IndicatorSnapshot) -> Option<SignalRecord> {
        let cfg = &self.config;

        // Stage 1: most recent EMA cross, and it must be fresh.
        let cross = match find_recent_cross(
            snapshot,
            cfg.cross_timeframe,
            cfg.ema_fast,
            cfg.ema_slow,
            cfg.cross_lookback,
        ) {
            CrossScan::Cross(event) => event,
            CrossScan::NoCross | CrossScan::InsufficientData => return None,
        };
        if cross.hours_ago > cfg.max_cross_age_hours {
            return None;
        }

        // Stage 2: slow-EMA trend must confirm the cross direction.
        if !cross.is_trend_aligned() {
            return None;
        }

        // Stage 3: ADX must classify; any tier continues, weak tiers warn.
        let adx = classify_adx(snapshot, cfg.confirm_fast, cfg.confirm_slow, cfg.adx_threshold)?;

        // Stage 4: RSI must classify and agree with the cross direction.
        let rsi = classify_rsi(snapshot, cfg.confirm_fast, cfg.confirm_slow, cfg.rsi_midpoint)?;
        if rsi.direction != cross.direction {
            return None;
        }

        // Stage 5: both volume filters must pass.
        let volume = match analyze_volume(
            snapshot,
            cfg.cross_timeframe,
            cfg.volume_lookback,
            cfg.surge_len,
            cfg.base_multiplier,
        ) {
            VolumeVerdict::Report(report) if report.combined_pass => report,
            _ => return None,
        };

        let mut warnings = Vec::new();
        if let Some(warning) = adx.warning() {
            warnings.push(warning);
        }
        if let Some(warning) = rsi.warning() {
            warnings.push(warning);
        }

        Some(SignalRecord {
            direction: cross.direction,
            slow_trend: cross.slow_trend,
            cross,
            adx,
            rsi,
            volume,
            warnings,
        })
    }
}
