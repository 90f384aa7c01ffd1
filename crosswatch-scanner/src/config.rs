//! Scanner configuration loaded from TOML.

use crate::source::RetryPolicy;
use crosswatch_core::{IndicatorConfig, SignalConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub scanner: ScanSettings,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
}

impl ScannerConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Scan loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Symbols to scan, in order.
    pub symbols: Vec<String>,

    /// Candles fetched per symbol and timeframe.
    #[serde(default = "default_candle_limit")]
    pub candle_limit: usize,

    /// Seconds between scan cycles.
    #[serde(default = "default_loop_interval_secs")]
    pub loop_interval_secs: u64,

    /// Alert deduplication state file.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Directory holding recorded candle JSON files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_candle_limit() -> usize {
    500
}

fn default_loop_interval_secs() -> u64 {
    1200
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/state.json")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/candles")
}

/// Rate limit safety settings for the candle source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Retries per request after the first attempt.
    pub max_retries: u32,
    /// Seconds between retries of the same request.
    pub retry_delay_secs: u64,
    /// Milliseconds between successive requests.
    pub request_delay_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay_secs: 5,
            request_delay_ms: 500,
        }
    }
}

impl SourceSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            request_delay: Duration::from_millis(self.request_delay_ms),
        }
    }
}

/// Telegram bot credentials; both empty disables the channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}
