//! CrossWatch Core — snapshot model, indicators, and the signal fusion gate.
//!
//! This crate contains the decision engine:
//! - Domain types (candles, timeframes)
//! - Indicator computations (EMA series, latest RSI, latest ADX)
//! - Immutable per-cycle indicator snapshot
//! - EMA cross detection with trend-alignment validation
//! - ADX strength and RSI momentum classifiers
//! - Adaptive dual-filter volume surge analysis
//! - The five-stage all-must-pass signal compositor
//!
//! Evaluations are pure functions of (snapshot, config): no I/O, no shared
//! mutable state, safe to run for many instruments in parallel.

pub mod config;
pub mod domain;
pub mod indicators;
pub mod signal;
pub mod snapshot;

pub use config::{IndicatorConfig, SignalConfig};
pub use signal::{Direction, SignalCompositor, SignalRecord};
pub use snapshot::IndicatorSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: evaluation inputs and outputs are Send + Sync, so
    /// per-instrument evaluations can run on worker threads without retrofit.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        require_send::<snapshot::IndicatorSnapshot>();
        require_sync::<snapshot::IndicatorSnapshot>();
        require_send::<snapshot::TimeframeIndicators>();
        require_sync::<snapshot::TimeframeIndicators>();

        require_send::<config::SignalConfig>();
        require_sync::<config::SignalConfig>();
        require_send::<config::IndicatorConfig>();
        require_sync::<config::IndicatorConfig>();

        require_send::<signal::CrossEvent>();
        require_sync::<signal::CrossEvent>();
        require_send::<signal::AdxAssessment>();
        require_sync::<signal::AdxAssessment>();
        require_send::<signal::RsiAssessment>();
        require_sync::<signal::RsiAssessment>();
        require_send::<signal::VolumeVerdict>();
        require_sync::<signal::VolumeVerdict>();
        require_send::<signal::SignalRecord>();
        require_sync::<signal::SignalRecord>();
        require_send::<signal::SignalCompositor>();
        require_sync::<signal::SignalCompositor>();
    }
}
