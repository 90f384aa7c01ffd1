//! Candle source trait and structured error types.
//!
//! The CandleSource trait abstracts over upstream candle feeds (exchange
//! REST endpoints, recorded JSON files) so the scan loop can swap
//! implementations and mock for tests. Retry and request pacing live in a
//! wrapper, not in the implementations.

use crosswatch_core::domain::{Candle, Timeframe};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Structured error types for candle fetching.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by source (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no candle data for '{symbol}' at {timeframe}")]
    NoData { symbol: String, timeframe: Timeframe },

    #[error("source I/O error: {0}")]
    Io(String),

    #[error("source error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Missing symbols and format changes are terminal; transient transport
    /// failures and rate limits are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::NetworkUnreachable(_)
                | SourceError::RateLimited { .. }
                | SourceError::Io(_)
                | SourceError::Other(_)
        )
    }
}

/// Trait for candle feeds.
///
/// Implementations fetch one symbol/timeframe series per call, most recent
/// candle last, at most `limit` candles. They do not retry; the
/// [`RetryingSource`] wrapper owns that policy.
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch up to `limit` most recent candles, chronological order.
    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError>;
}

/// Fixed-backoff retry and request pacing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts beyond the first.
    pub max_retries: u32,
    /// Sleep between attempts of the same request.
    pub retry_delay: Duration,
    /// Sleep after every successful request, to stay under rate limits.
    pub request_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: Duration::from_secs(5),
            request_delay: Duration::from_millis(500),
        }
    }
}

/// Wraps a source with retry and pacing behaviour.
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: CandleSource> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<S: CandleSource> CandleSource for RetryingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        let mut last_error = None;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.policy.retry_delay);
            }

            match self.inner.fetch(symbol, timeframe, limit) {
                Ok(candles) => {
                    if !self.policy.request_delay.is_zero() {
                        std::thread::sleep(self.policy.request_delay);
                    }
                    return Ok(candles);
                }
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::Other("max retries exceeded".into())))
    }
}

/// File-backed source reading recorded candles from a directory tree.
///
/// Layout: `<root>/<SYMBOL>/<timeframe>.json`, each file a JSON array of
/// candles in chronological order. Used for offline runs, replays, and the
/// `eval` command's fixtures.
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candle_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.root
            .join(symbol)
            .join(format!("{}.json", timeframe.label()))
    }
}

impl CandleSource for JsonDirSource {
    fn name(&self) -> &str {
        "json_dir"
    }

    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, SourceError> {
        if !self.root.join(symbol).is_dir() {
            return Err(SourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let path = self.candle_path(symbol, timeframe);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NoData {
                    symbol: symbol.to_string(),
                    timeframe,
                }
            } else {
                SourceError::Io(format!("{}: {e}", path.display()))
            }
        })?;

        let mut candles: Vec<Candle> = serde_json::from_str(&content).map_err(|e| {
            SourceError::ResponseFormatChanged(format!("{}: {e}", path.display()))
        })?;

        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }
        Ok(candles)
    }
}
