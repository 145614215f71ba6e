//! Serde-loadable logger configuration
//!
//! Every field is optional; unset fields keep the builder's (or the parent
//! logger's) value.
//!
//! ```
//! use rust_console_logger::core::LoggerConfig;
//!
//! let config = LoggerConfig::from_json(r#"{"level": "debug", "throttle_ms": 250}"#).unwrap();
//! assert_eq!(config.throttle_ms, Some(250));
//! ```

use super::error::{LoggerError, Result};
use super::log_entry::LogDefaults;
use super::log_level::LevelInput;
use super::log_types::LogTypes;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Number, level name or kind name
    pub level: Option<LevelInput>,
    pub throttle_ms: Option<u64>,
    pub throttle_min_repeats: Option<u32>,
    pub date: Option<bool>,
    pub colors: Option<bool>,
    pub compact: Option<bool>,
    pub columns: Option<usize>,
    pub timestamp_format: Option<TimestampFormat>,
    /// Replaces the kind table wholesale
    pub types: Option<LogTypes>,
    pub defaults: Option<LogDefaults>,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("logger config", e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("read", format!("cannot read config {}", path.display()), e)
        })?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = Some(level.into());
        self
    }

    #[must_use]
    pub fn types(mut self, types: LogTypes) -> Self {
        self.types = Some(types);
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: LogDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(types) = &self.types {
            if types.is_empty() {
                return Err(LoggerError::config("types", "kind table must not be empty"));
            }
        }
        if self.columns == Some(0) {
            return Err(LoggerError::config("columns", "must be positive when set"));
        }
        Ok(())
    }
}
