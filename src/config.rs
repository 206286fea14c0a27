// In: src/config.rs

//! The single source of truth for engine configuration.
//!
//! `EngineConfig` is created once at the application boundary (typically from a
//! JSON file) and then consulted by the components that have tunables: the
//! `TrackingAllocator` (byte budget), `StreamRange` (no-progress guard) and the
//! logging bootstrap (level). Every field has a serde default, so `{}` is a
//! valid configuration.

use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::TransduceError;

//==================================================================================
// I. The Unified EngineConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// When set, allocators built from this config refuse any allocation that
    /// would push the live byte count above this budget.
    #[serde(default)]
    pub allocation_budget_bytes: Option<usize>,

    /// A stream range latches `Fault` once its segment source has produced this
    /// many empty segments in a row. Must be non-zero.
    #[serde(default = "default_max_consecutive_empty_segments")]
    pub max_consecutive_empty_segments: usize,

    /// Log level name understood by the `log` crate ("off", "error", ..., "trace").
    /// `None` leaves logging uninitialised.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allocation_budget_bytes: None,
            max_consecutive_empty_segments: default_max_consecutive_empty_segments(),
            log_level: None,
        }
    }
}

/// Helper for `serde` to provide a default for `max_consecutive_empty_segments`.
fn default_max_consecutive_empty_segments() -> usize {
    1024
}

//==================================================================================
// II. Loading & Validation
//==================================================================================

impl EngineConfig {
    /// Parses and validates a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, TransduceError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TransduceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), TransduceError> {
        if self.max_consecutive_empty_segments == 0 {
            return Err(TransduceError::InvalidConfig(
                "max_consecutive_empty_segments must be at least 1".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    /// The configured log level, if any.
    pub fn level_filter(&self) -> Result<Option<LevelFilter>, TransduceError> {
        self.log_level
            .as_deref()
            .map(|name| {
                LevelFilter::from_str(name).map_err(|_| {
                    TransduceError::InvalidConfig(format!("unknown log level '{}'", name))
                })
            })
            .transpose()
    }
}
