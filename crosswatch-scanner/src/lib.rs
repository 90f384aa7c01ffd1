//! CrossWatch Scanner — everything around the engine.
//!
//! The core crate decides; this crate feeds and reports:
//! - Candle source trait with retry and request pacing, plus a JSON
//!   directory source for offline runs
//! - Alert deduplication state persisted as JSON
//! - Signal rendering and notification channels (stdout, Telegram)
//! - The multi-symbol scan cycle
//! - TOML configuration for all of the above

pub mod config;
pub mod notify;
pub mod scan;
pub mod source;
pub mod state;

pub use config::{ConfigError, ScannerConfig};
pub use notify::{Notifier, NotifyError, StdoutNotifier, TelegramNotifier};
pub use scan::{ScanError, ScanProgress, ScanSummary, Scanner, StdoutProgress, SymbolOutcome};
pub use source::{CandleSource, JsonDirSource, RetryPolicy, RetryingSource, SourceError};
pub use state::{AlertState, StateError};
