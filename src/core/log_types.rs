//! Log kinds and their default attributes
//!
//! The kind table is plain data. It ships with the built-in kinds and can be
//! replaced wholesale through configuration.

use super::log_level::{LevelInput, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default attributes for one log kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<bool>,
}

impl LogType {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_badge(mut self, badge: bool) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Name → [`LogType`] mapping. Names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, LogType>", into = "BTreeMap<String, LogType>")]
pub struct LogTypes {
    types: BTreeMap<String, LogType>,
}

impl From<BTreeMap<String, LogType>> for LogTypes {
    fn from(types: BTreeMap<String, LogType>) -> Self {
        Self {
            types: types
                .into_iter()
                .map(|(name, log_type)| (name.to_lowercase(), log_type))
                .collect(),
        }
    }
}

impl From<LogTypes> for BTreeMap<String, LogType> {
    fn from(types: LogTypes) -> Self {
        types.types
    }
}

impl LogTypes {
    /// An empty table
    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Load a table from JSON, e.g. `{"notice": {"level": 2, "icon": "!"}}`
    pub fn from_json(json: &str) -> super::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, log_type: LogType) {
        self.types.insert(name.into().to_lowercase(), log_type);
    }

    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>, log_type: LogType) -> Self {
        self.insert(name, log_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<&LogType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a caller-supplied severity.
    ///
    /// Unset → `default`; numeric → unchanged; a kind name with a configured
    /// level → that level; anything else → `default`.
    pub fn normalize_level(&self, input: Option<&LevelInput>, default: LogLevel) -> LogLevel {
        match input {
            None => default,
            Some(LevelInput::Numeric(level)) => *level,
            Some(LevelInput::Named(name)) => self
                .types
                .get(&name.to_lowercase())
                .and_then(|t| t.level)
                .unwrap_or(default),
        }
    }

    /// Severity of a kind, defaulting to info when the kind carries no level
    pub fn level_of(&self, kind: &str) -> LogLevel {
        self.normalize_level(Some(&LevelInput::Named(kind.to_string())), LogLevel::INFO)
    }
}

impl Default for LogTypes {
    fn default() -> Self {
        let mut types = BTreeMap::new();
        let mut add = |name: &str, level: LogLevel| {
            types.insert(name.to_string(), LogType::new(level));
        };
        add("silent", LogLevel::Level(-1));
        add("fatal", LogLevel::FATAL);
        add("error", LogLevel::ERROR);
        add("warn", LogLevel::WARN);
        add("log", LogLevel::LOG);
        add("info", LogLevel::INFO);
        add("success", LogLevel::INFO);
        add("fail", LogLevel::INFO);
        add("ready", LogLevel::INFO);
        add("start", LogLevel::INFO);
        add("box", LogLevel::INFO);
        add("debug", LogLevel::DEBUG);
        add("trace", LogLevel::TRACE);
        add("verbose", LogLevel::Verbose);
        Self { types }
    }
}
