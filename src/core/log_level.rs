//! Log level definitions
//!
//! Severities live on an open integer scale where lower is more severe.
//! `Silent` and `Verbose` are the two infinite sentinels: a threshold of
//! `Silent` admits nothing and a threshold of `Verbose` admits everything.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Negative infinity, never emitted
    Silent,
    Level(i64),
    /// Positive infinity, always emitted
    Verbose,
}

impl LogLevel {
    pub const FATAL: LogLevel = LogLevel::Level(0);
    pub const ERROR: LogLevel = LogLevel::Level(0);
    pub const WARN: LogLevel = LogLevel::Level(1);
    pub const LOG: LogLevel = LogLevel::Level(2);
    pub const INFO: LogLevel = LogLevel::Level(3);
    pub const DEBUG: LogLevel = LogLevel::Level(4);
    pub const TRACE: LogLevel = LogLevel::Level(5);

    /// Whether a record at this level passes a threshold.
    ///
    /// A record is dropped when it is numerically greater (less severe)
    /// than the threshold.
    #[inline]
    pub fn passes(&self, threshold: LogLevel) -> bool {
        *self <= threshold
    }

    /// Fatal, error and warn output is routed to stderr
    #[inline]
    pub fn is_stderr(&self) -> bool {
        *self < LogLevel::LOG
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Level(0) => "error",
            LogLevel::Level(1) => "warn",
            LogLevel::Level(2) => "log",
            LogLevel::Level(3) => "info",
            LogLevel::Level(4) => "debug",
            LogLevel::Level(5) => "trace",
            LogLevel::Level(_) => "custom",
            LogLevel::Verbose => "verbose",
        }
    }

    /// Numeric value, with the sentinels mapped to the `i64` extremes
    pub fn as_i64(&self) -> i64 {
        match self {
            LogLevel::Silent => i64::MIN,
            LogLevel::Level(n) => *n,
            LogLevel::Verbose => i64::MAX,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl From<i64> for LogLevel {
    fn from(n: i64) -> Self {
        LogLevel::Level(n)
    }
}

impl From<i32> for LogLevel {
    fn from(n: i32) -> Self {
        LogLevel::Level(n as i64)
    }
}

impl From<f64> for LogLevel {
    fn from(n: f64) -> Self {
        if n == f64::NEG_INFINITY {
            LogLevel::Silent
        } else if n == f64::INFINITY {
            LogLevel::Verbose
        } else {
            LogLevel::Level(n as i64)
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Level(n) => write!(f, "{}", n),
            other => write!(f, "{}", other.to_str()),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(LogLevel::Level(n));
        }
        match trimmed.to_lowercase().as_str() {
            "silent" | "-infinity" => Ok(LogLevel::Silent),
            "fatal" | "error" => Ok(LogLevel::ERROR),
            "warn" | "warning" => Ok(LogLevel::WARN),
            "log" => Ok(LogLevel::LOG),
            "info" => Ok(LogLevel::INFO),
            "debug" => Ok(LogLevel::DEBUG),
            "trace" => Ok(LogLevel::TRACE),
            "verbose" | "infinity" => Ok(LogLevel::Verbose),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogLevel::Level(n) => serializer.serialize_i64(*n),
            other => serializer.serialize_str(other.to_str()),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = LogLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer severity or a level name")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LogLevel, E> {
                Ok(LogLevel::Level(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LogLevel, E> {
                i64::try_from(v)
                    .map(LogLevel::Level)
                    .map_err(|_| E::custom("severity out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<LogLevel, E> {
                Ok(LogLevel::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LogLevel, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// A severity as supplied by a caller: a number, a kind name, or nothing.
///
/// Resolved to a [`LogLevel`] against a kind table by
/// [`LogTypes::normalize_level`](super::log_types::LogTypes::normalize_level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelInput {
    Numeric(LogLevel),
    Named(String),
}

impl From<LogLevel> for LevelInput {
    fn from(level: LogLevel) -> Self {
        LevelInput::Numeric(level)
    }
}

impl From<i64> for LevelInput {
    fn from(n: i64) -> Self {
        LevelInput::Numeric(LogLevel::Level(n))
    }
}

impl From<i32> for LevelInput {
    fn from(n: i32) -> Self {
        LevelInput::Numeric(LogLevel::from(n))
    }
}

impl From<&str> for LevelInput {
    fn from(name: &str) -> Self {
        LevelInput::Named(name.to_string())
    }
}

impl From<String> for LevelInput {
    fn from(name: String) -> Self {
        LevelInput::Named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_ordering() {
        assert!(LogLevel::Silent < LogLevel::Level(i64::MIN));
        assert!(LogLevel::Level(i64::MAX) < LogLevel::Verbose);
        assert!(LogLevel::FATAL < LogLevel::WARN);
        assert!(LogLevel::Level(-3) < LogLevel::FATAL);
    }

    #[test]
    fn test_passes_threshold() {
        assert!(LogLevel::WARN.passes(LogLevel::INFO));
        assert!(!LogLevel::DEBUG.passes(LogLevel::INFO));
        assert!(!LogLevel::FATAL.passes(LogLevel::Silent));
        assert!(LogLevel::Level(1_000).passes(LogLevel::Verbose));
    }

    #[test]
    fn test_stderr_routing() {
        assert!(LogLevel::ERROR.is_stderr());
        assert!(LogLevel::WARN.is_stderr());
        assert!(!LogLevel::LOG.is_stderr());
        assert!(!LogLevel::INFO.is_stderr());
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::WARN);
        assert_eq!("7".parse::<LogLevel>().unwrap(), LogLevel::Level(7));
        assert_eq!("VERBOSE".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert!("loud".parse::<LogLevel>().is_err());

        let level: LogLevel = serde_json::from_str("4").unwrap();
        assert_eq!(level, LogLevel::DEBUG);
        let level: LogLevel = serde_json::from_str("\"silent\"").unwrap();
        assert_eq!(level, LogLevel::Silent);
        assert_eq!(serde_json::to_string(&LogLevel::Verbose).unwrap(), "\"verbose\"");
    }

    #[test]
    fn test_level_input_untagged() {
        let input: LevelInput = serde_json::from_str("2").unwrap();
        assert_eq!(input, LevelInput::Numeric(LogLevel::LOG));
        let input: LevelInput = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(input, LevelInput::Named("success".to_string()));
    }
}
