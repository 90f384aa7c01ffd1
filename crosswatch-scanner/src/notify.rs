//! Signal rendering and notification channels.
//!
//! A passing record is rendered once into plain text and handed to every
//! configured channel. The Telegram channel degrades to a skip when no
//! credentials are configured, so an unconfigured bot never turns a valid
//! signal into an error.

use crosswatch_core::SignalRecord;
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

/// Errors delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport: {0}")]
    Transport(String),

    #[error("notification rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Render a passing signal as a plain-text report.
pub fn render_signal(symbol: &str, record: &SignalRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} SIGNAL DETECTED", record.direction);
    let _ = writeln!(out, "--------------------------------");
    let _ = writeln!(out, "Symbol: {symbol}");
    let _ = writeln!(out);
    let _ = writeln!(out, "EMA CROSS");
    let _ = writeln!(out, "  Type: {}", record.cross.direction);
    let _ = writeln!(
        out,
        "  Time: {}",
        record.cross.occurred_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "  Hours Ago: {:.1}h", record.cross.hours_ago);
    let _ = writeln!(out, "  Candles Ago: {}", record.cross.candles_ago);
    let _ = writeln!(out, "  Slow EMA Trend: {}", record.slow_trend);
    let _ = writeln!(out);
    let _ = writeln!(out, "RSI MOMENTUM");
    let _ = writeln!(
        out,
        "  Signal: {} ({})",
        record.rsi.direction, record.rsi.strength
    );
    let _ = writeln!(
        out,
        "  RSI {}: {:.2}",
        record.rsi.fast_tf, record.rsi.fast_value
    );
    let _ = writeln!(
        out,
        "  RSI {}: {:.2}",
        record.rsi.slow_tf, record.rsi.slow_value
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "ADX TREND STRENGTH");
    let _ = writeln!(out, "  Strength: {}", record.adx.tier);
    let _ = writeln!(
        out,
        "  ADX {}: {:.2}",
        record.adx.fast_tf, record.adx.fast_value
    );
    let _ = writeln!(
        out,
        "  ADX {}: {:.2}",
        record.adx.slow_tf, record.adx.slow_value
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "VOLUME ANALYSIS");
    let _ = writeln!(
        out,
        "  Filter A (absolute strength): {}",
        if record.volume.filter_a_pass { "PASS" } else { "FAIL" }
    );
    let _ = writeln!(
        out,
        "  Filter B (relative expansion): {}",
        if record.volume.filter_b_pass { "PASS" } else { "FAIL" }
    );
    let _ = writeln!(out, "  Recent Avg: {:.2}", record.volume.recent_avg);
    let _ = writeln!(out, "  Historical Avg: {:.2}", record.volume.historical_avg);
    let _ = writeln!(out, "  Spike Ratio: {:.2}x", record.volume.spike_ratio);

    if !record.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "WARNINGS:");
        for warning in &record.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    out
}

/// Trait for notification channels.
pub trait Notifier: Send + Sync {
    /// Human-readable name of this channel.
    fn name(&self) -> &str;

    /// Deliver one rendered signal.
    fn notify(&self, symbol: &str, record: &SignalRecord) -> Result<(), NotifyError>;
}

/// Prints rendered signals to stdout.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn name(&self) -> &str {
        "stdout"
    }

    fn notify(&self, symbol: &str, record: &SignalRecord) -> Result<(), NotifyError> {
        println!("\n{}", render_signal(symbol, record));
        Ok(())
    }
}

/// Sends rendered signals through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Whether both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn notify(&self, symbol: &str, record: &SignalRecord) -> Result<(), NotifyError> {
        if !self.is_configured() {
            println!("Telegram bot token or chat ID missing; skipping notification.");
            return Ok(());
        }

        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", &render_signal(symbol, record)),
            ("disable_web_page_preview", "true"),
        ];

        let resp = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
