//! Alert deduplication state.
//!
//! One JSON file keyed `{symbol}_{direction}` mapping to the cross timestamp
//! last alerted for that pair. A signal is a duplicate only while its cross
//! timestamp matches the stored one; a new cross for the same symbol and
//! direction alerts again.

use chrono::{DateTime, Utc};
use crosswatch_core::signal::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors loading or persisting the alert state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent map of alerts already sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertState {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl AlertState {
    /// Load from `path`; a missing file yields the empty state.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn key(symbol: &str, direction: Direction) -> String {
        format!("{symbol}_{direction}")
    }

    /// Whether this exact cross was already alerted.
    pub fn already_alerted(
        &self,
        symbol: &str,
        direction: Direction,
        occurred_at: DateTime<Utc>,
    ) -> bool {
        self.entries.get(&Self::key(symbol, direction)) == Some(&occurred_at)
    }

    /// Record an alert for this cross, replacing any older one.
    pub fn mark_alerted(
        &mut self,
        symbol: &str,
        direction: Direction,
        occurred_at: DateTime<Utc>,
    ) {
        self.entries.insert(Self::key(symbol, direction), occurred_at);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
