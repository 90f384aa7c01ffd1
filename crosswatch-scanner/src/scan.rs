//! Multi-symbol scan cycle.
//!
//! One cycle walks the symbol universe in order: fetch candles for every
//! required timeframe, build a snapshot, run the gate, dedup against the
//! alert state, notify. A failing symbol is reported and skipped; the cycle
//! always finishes.

use crate::notify::{NotifyError, Notifier};
use crate::source::{CandleSource, SourceError};
use crate::state::{AlertState, StateError};
use chrono::Utc;
use crosswatch_core::domain::{Candle, Timeframe};
use crosswatch_core::{
    IndicatorConfig, IndicatorSnapshot, SignalCompositor, SignalConfig, SignalRecord,
};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors from one symbol evaluation or cycle bookkeeping.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// What happened for one symbol in a cycle.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// The gate passed and the alert was delivered.
    Signal(Box<SignalRecord>),
    /// The gate passed but this exact cross was already alerted.
    Duplicate(Box<SignalRecord>),
    /// The normal negative outcome.
    NoSignal,
    /// Fetch or evaluation failed; the cycle continued.
    Failed(ScanError),
}

/// Per-cycle totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub signals: usize,
    pub duplicates: usize,
    pub failures: usize,
}

/// Progress callbacks for a scan cycle.
pub trait ScanProgress: Send {
    /// Called before each symbol is evaluated.
    fn on_symbol_start(&self, symbol: &str, index: usize, total: usize);

    /// Called after each symbol, with its outcome.
    fn on_symbol_done(&self, symbol: &str, outcome: &SymbolOutcome);

    /// Called when a notification channel fails for a delivered signal.
    fn on_notify_error(&self, symbol: &str, channel: &str, error: &NotifyError);

    /// Called once per cycle with the totals.
    fn on_cycle_complete(&self, summary: &ScanSummary);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl ScanProgress for StdoutProgress {
    fn on_symbol_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Checking {symbol}...", index + 1, total);
    }

    fn on_symbol_done(&self, symbol: &str, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Signal(record) => {
                println!("  SIGNAL: {symbol} {}", record.direction)
            }
            SymbolOutcome::Duplicate(record) => {
                println!("  duplicate: {symbol} {} already alerted", record.direction)
            }
            SymbolOutcome::NoSignal => println!("  no signal: {symbol}"),
            SymbolOutcome::Failed(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_notify_error(&self, symbol: &str, channel: &str, error: &NotifyError) {
        println!("  notify via {channel} failed for {symbol}: {error}");
    }

    fn on_cycle_complete(&self, summary: &ScanSummary) {
        println!(
            "\nCycle complete: {} scanned, {} signals, {} duplicates, {} failures",
            summary.scanned, summary.signals, summary.duplicates, summary.failures
        );
    }
}

/// Evaluates the symbol universe against a candle source.
pub struct Scanner<S> {
    source: S,
    compositor: SignalCompositor,
    indicators: IndicatorConfig,
    candle_limit: usize,
}

impl<S: CandleSource> Scanner<S> {
    pub fn new(
        source: S,
        signal: SignalConfig,
        indicators: IndicatorConfig,
        candle_limit: usize,
    ) -> Self {
        Self {
            source,
            compositor: SignalCompositor::new(signal),
            indicators,
            candle_limit,
        }
    }

    pub fn config(&self) -> &SignalConfig {
        self.compositor.config()
    }

    /// Fetch candles, build a snapshot, and run the gate for one symbol.
    ///
    /// The snapshot time is the open time of the latest candle on the cross
    /// timeframe, so a detected cross keeps the same timestamp for as long
    /// as the data is unchanged. Deduplication depends on that stability.
    pub fn evaluate_symbol(&self, symbol: &str) -> Result<Option<SignalRecord>, ScanError> {
        let mut candles: BTreeMap<Timeframe, Vec<Candle>> = BTreeMap::new();
        for tf in self.compositor.config().required_timeframes() {
            candles.insert(tf, self.source.fetch(symbol, tf, self.candle_limit)?);
        }

        let as_of = candles
            .get(&self.compositor.config().cross_timeframe)
            .and_then(|series| series.last())
            .map(|candle| candle.open_time)
            .unwrap_or_else(Utc::now);

        let snapshot = IndicatorSnapshot::from_candles(as_of, &candles, &self.indicators);
        Ok(self.compositor.evaluate(&snapshot))
    }

    /// Run one cycle over the symbol universe.
    ///
    /// The state is updated in memory; callers persist it afterwards.
    pub fn scan_cycle(
        &self,
        symbols: &[String],
        state: &mut AlertState,
        notifiers: &[Box<dyn Notifier>],
        progress: &dyn ScanProgress,
    ) -> ScanSummary {
        let mut summary = ScanSummary::default();
        let total = symbols.len();

        for (index, symbol) in symbols.iter().enumerate() {
            progress.on_symbol_start(symbol, index, total);
            summary.scanned += 1;

            let outcome = match self.evaluate_symbol(symbol) {
                Err(e) => {
                    summary.failures += 1;
                    SymbolOutcome::Failed(e)
                }
                Ok(None) => SymbolOutcome::NoSignal,
                Ok(Some(record)) => {
                    let occurred_at = record.cross.occurred_at;
                    if state.already_alerted(symbol, record.direction, occurred_at) {
                        summary.duplicates += 1;
                        SymbolOutcome::Duplicate(Box::new(record))
                    } else {
                        for notifier in notifiers {
                            if let Err(e) = notifier.notify(symbol, &record) {
                                progress.on_notify_error(symbol, notifier.name(), &e);
                            }
                        }
                        state.mark_alerted(symbol, record.direction, occurred_at);
                        summary.signals += 1;
                        SymbolOutcome::Signal(Box::new(record))
                    }
                }
            };

            progress.on_symbol_done(symbol, &outcome);
        }

        progress.on_cycle_complete(&summary);
        summary
    }

    /// Load state, run one cycle, persist state.
    pub fn run_cycle(
        &self,
        symbols: &[String],
        state_path: &Path,
        notifiers: &[Box<dyn Notifier>],
        progress: &dyn ScanProgress,
    ) -> Result<ScanSummary, StateError> {
        let mut state = AlertState::load(state_path)?;
        let summary = self.scan_cycle(symbols, &mut state, notifiers, progress);
        state.save(state_path)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use crosswatch_core::signal::Direction;
    use std::sync::{Arc, Mutex};

    /// In-memory source keyed by symbol; serves the same series for every
    /// timeframe, which is enough for the cross and confirmation stages.
    struct MapSource {
        series: BTreeMap<String, Vec<Candle>>,
    }

    impl CandleSource for MapSource {
        fn name(&self) -> &str {
            "map"
        }

        fn fetch(
            &self,
            symbol: &str,
            _timeframe: Timeframe,
            limit: usize,
        ) -> Result<Vec<Candle>, SourceError> {
            let series = self.series.get(symbol).ok_or(SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
            let start = series.len().saturating_sub(limit);
            Ok(series[start..].to_vec())
        }
    }

    #[derive(Clone)]
    struct RecordingNotifier {
        delivered: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                delivered: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn delivered(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        fn notify(&self, symbol: &str, record: &SignalRecord) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .unwrap()
                .push(format!("{symbol} {}", record.direction));
            Ok(())
        }
    }

    struct SilentProgress;

    impl ScanProgress for SilentProgress {
        fn on_symbol_start(&self, _: &str, _: usize, _: usize) {}
        fn on_symbol_done(&self, _: &str, _: &SymbolOutcome) {}
        fn on_notify_error(&self, _: &str, _: &str, _: &NotifyError) {}
        fn on_cycle_complete(&self, _: &ScanSummary) {}
    }

    fn candle(i: usize, close: f64, volume: f64) -> Candle {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Candle {
            open_time: base + ChronoDuration::minutes(15 * i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    /// Decline then a violent rally with a closing volume surge; produces a
    /// fresh bullish signal under the default configuration.
    fn rally_series() -> Vec<Candle> {
        let mut series: Vec<Candle> = (0..300)
            .map(|i| candle(i, 160.0 - 0.2 * i as f64, 600.0))
            .collect();
        let floor = series.last().map(|c| c.close).unwrap_or(100.0);
        for j in 1..=8usize {
            let volume = if j > 4 { 5000.0 } else { 600.0 };
            series.push(candle(299 + j, floor + 20.0 * j as f64, volume));
        }
        series
    }

    fn flat_series() -> Vec<Candle> {
        (0..260).map(|i| candle(i, 100.0, 600.0)).collect()
    }

    fn scanner_with(series: BTreeMap<String, Vec<Candle>>) -> Scanner<MapSource> {
        Scanner::new(
            MapSource { series },
            SignalConfig::default(),
            IndicatorConfig::default(),
            500,
        )
    }

    #[test]
    fn cycle_notifies_and_dedups_across_cycles() {
        let mut series = BTreeMap::new();
        series.insert("BTCUSDT".to_string(), rally_series());
        series.insert("ETHUSDT".to_string(), flat_series());
        let scanner = scanner_with(series);

        let recorder = RecordingNotifier::new();
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(recorder.clone())];
        let symbols = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];
        let mut state = AlertState::default();

        let first = scanner.scan_cycle(&symbols, &mut state, &notifiers, &SilentProgress);
        assert_eq!(first.scanned, 2);
        assert_eq!(first.signals, 1);
        assert_eq!(first.duplicates, 0);
        assert_eq!(first.failures, 0);

        // Same data in the next cycle: the cross timestamp is unchanged, so
        // the signal is a duplicate and nothing is delivered again.
        let second = scanner.scan_cycle(&symbols, &mut state, &notifiers, &SilentProgress);
        assert_eq!(second.signals, 0);
        assert_eq!(second.duplicates, 1);

        assert_eq!(recorder.delivered(), vec!["BTCUSDT BULLISH"]);
    }

    #[test]
    fn failed_symbol_does_not_stop_the_cycle() {
        let mut series = BTreeMap::new();
        series.insert("ETHUSDT".to_string(), rally_series());
        let scanner = scanner_with(series);

        let symbols = vec!["MISSING".to_string(), "ETHUSDT".to_string()];
        let mut state = AlertState::default();
        let notifiers: Vec<Box<dyn Notifier>> = vec![];

        let summary = scanner.scan_cycle(&symbols, &mut state, &notifiers, &SilentProgress);
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.signals, 1);
    }

    #[test]
    fn run_cycle_persists_state_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");

        let mut series = BTreeMap::new();
        series.insert("BTCUSDT".to_string(), rally_series());
        let scanner = scanner_with(series);
        let symbols = vec!["BTCUSDT".to_string()];
        let notifiers: Vec<Box<dyn Notifier>> = vec![];

        let first = scanner
            .run_cycle(&symbols, &state_path, &notifiers, &SilentProgress)
            .unwrap();
        assert_eq!(first.signals, 1);
        assert!(state_path.exists());

        let second = scanner
            .run_cycle(&symbols, &state_path, &notifiers, &SilentProgress)
            .unwrap();
        assert_eq!(second.signals, 0);
        assert_eq!(second.duplicates, 1);
    }

    #[test]
    fn cross_timestamp_is_anchored_to_the_latest_candle() {
        let series_data = rally_series();
        let last_open = series_data.last().unwrap().open_time;
        let mut series = BTreeMap::new();
        series.insert("BTCUSDT".to_string(), series_data);
        let scanner = scanner_with(series);

        let record = scanner.evaluate_symbol("BTCUSDT").unwrap().unwrap();
        assert_eq!(record.direction, Direction::Bullish);
        assert!(record.cross.hours_ago <= 2.0);
        assert_eq!(
            record.cross.occurred_at,
            last_open - ChronoDuration::minutes(15 * record.cross.candles_ago as i64)
        );

        // Re-evaluating the same data reproduces the same timestamp.
        let again = scanner.evaluate_symbol("BTCUSDT").unwrap().unwrap();
        assert_eq!(again.cross.occurred_at, record.cross.occurred_at);
    }
}
