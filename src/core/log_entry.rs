//! Log values, caller-supplied partial records and normalized log entries

use super::log_level::{LevelInput, LogLevel};
use super::log_types::{LogType, LogTypes};
use chrono::{DateTime, Utc};
use serde::ser::{self, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// One positional log argument
#[derive(Clone)]
pub enum LogValue {
    Str(String),
    Json(Value),
    Error(ErrorValue),
    /// A value that can be shown but not fingerprinted for deduplication
    Opaque(Arc<dyn fmt::Debug + Send + Sync>),
}

impl LogValue {
    /// Wrap an opaque value rendered through its `Debug` implementation
    pub fn opaque<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        LogValue::Opaque(Arc::new(value))
    }

    /// Capture a `std::error::Error` together with its `source()` chain
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        LogValue::Error(ErrorValue::from_error(err))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LogValue::Str(s) => Some(s),
            LogValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            LogValue::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Plain-text rendering of a non-error value
    pub fn to_text(&self, compact: bool) -> String {
        match self {
            LogValue::Str(s) => s.clone(),
            LogValue::Json(Value::String(s)) => s.clone(),
            LogValue::Json(value @ (Value::Array(_) | Value::Object(_))) => {
                let rendered = if compact {
                    serde_json::to_string(value)
                } else {
                    serde_json::to_string_pretty(value)
                };
                rendered.unwrap_or_default()
            }
            LogValue::Json(value) => value.to_string(),
            LogValue::Error(err) => err.to_string(),
            LogValue::Opaque(value) => format!("{:?}", value),
        }
    }
}

impl fmt::Debug for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            LogValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            LogValue::Error(e) => f.debug_tuple("Error").field(e).finish(),
            LogValue::Opaque(o) => f.debug_tuple("Opaque").field(o).finish(),
        }
    }
}

impl PartialEq for LogValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LogValue::Str(a), LogValue::Str(b)) => a == b,
            (LogValue::Json(a), LogValue::Json(b)) => a == b,
            (LogValue::Error(a), LogValue::Error(b)) => a == b,
            (LogValue::Opaque(a), LogValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for LogValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogValue::Str(s) => serializer.serialize_str(s),
            LogValue::Json(v) => v.serialize(serializer),
            LogValue::Error(e) => e.serialize(serializer),
            LogValue::Opaque(_) => Err(ser::Error::custom("opaque value cannot be serialized")),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Str(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Str(s)
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::Str(s.clone())
    }
}

impl From<Value> for LogValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => LogValue::Str(s),
            other => LogValue::Json(other),
        }
    }
}

impl From<i64> for LogValue {
    fn from(n: i64) -> Self {
        LogValue::Json(Value::from(n))
    }
}

impl From<i32> for LogValue {
    fn from(n: i32) -> Self {
        LogValue::Json(Value::from(n))
    }
}

impl From<u64> for LogValue {
    fn from(n: u64) -> Self {
        LogValue::Json(Value::from(n))
    }
}

impl From<usize> for LogValue {
    fn from(n: usize) -> Self {
        LogValue::Json(Value::from(n))
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        LogValue::Json(Value::from(n))
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Json(Value::Bool(b))
    }
}

impl From<ErrorValue> for LogValue {
    fn from(e: ErrorValue) -> Self {
        LogValue::Error(e)
    }
}

/// An error-like argument: a message plus an optional stack trace and cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    /// Full stack text; its leading lines repeat the `name: message` header
    pub stack: Option<String>,
    pub cause: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            message: message.into(),
            stack: None,
            cause: None,
        }
    }

    /// Create an error with a stack captured at the call site
    pub fn capture(message: impl Into<String>) -> Self {
        let mut err = Self::new(message);
        let frames = crate::utils::stack::capture_frames();
        err.stack = Some(crate::utils::stack::compose_stack(&err.header(), &frames));
        err
    }

    /// Convert a `std::error::Error`, following `source()` for causes
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut value = Self::new(err.to_string());
        if let Some(source) = err.source() {
            value.cause = Some(Box::new(Self::from_error(source)));
        }
        value
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: ErrorValue) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// `name: message`, the first line(s) of a stack
    pub fn header(&self) -> String {
        format!("{}: {}", self.name, self.message)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

impl std::error::Error for ErrorValue {}

/// The stack is left out: errors only differ by their name, message and causes
impl Serialize for ErrorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorValue", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("cause", &self.cause)?;
        state.end()
    }
}

/// Extra lines appended after the arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Additional {
    Text(String),
    Lines(Vec<String>),
}

impl Additional {
    fn into_lines(self) -> Vec<String> {
        match self {
            Additional::Text(text) => text.split('\n').map(String::from).collect(),
            Additional::Lines(lines) => lines,
        }
    }
}

/// A caller-supplied, partially filled record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialLogEntry {
    pub level: Option<LevelInput>,
    pub kind: Option<String>,
    pub tag: Option<String>,
    pub message: Option<LogValue>,
    pub additional: Option<Additional>,
    pub args: Option<Vec<LogValue>>,
    pub timestamp: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<bool>,
    pub extra: Map<String, Value>,
}

impl PartialLogEntry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<LogValue>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = Some(level.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn additional(mut self, additional: Additional) -> Self {
        self.additional = Some(additional);
        self
    }

    #[must_use]
    pub fn args(mut self, args: Vec<LogValue>) -> Self {
        self.args = Some(args);
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn badge(mut self, badge: bool) -> Self {
        self.badge = Some(badge);
        self
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Structural check for a plain object that should be merged as a record.
    ///
    /// This is a heuristic: the object must carry `message` or `args` and must
    /// not carry `stack`. Stack presence wins, so error-shaped objects stay
    /// literal arguments.
    pub fn is_log_object(map: &Map<String, Value>) -> bool {
        (map.contains_key("message") || map.contains_key("args")) && !map.contains_key("stack")
    }

    /// Build a partial record from a plain key-value object
    pub fn from_object(map: Map<String, Value>) -> Self {
        let mut entry = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "level" => {
                    entry.level = match value {
                        Value::Number(n) => n
                            .as_i64()
                            .map(LevelInput::from)
                            .or_else(|| n.as_f64().map(|f| LevelInput::Numeric(f.into()))),
                        Value::String(s) => Some(LevelInput::Named(s)),
                        _ => None,
                    }
                }
                "type" | "kind" => entry.kind = value.as_str().map(String::from),
                "tag" => entry.tag = value.as_str().map(String::from),
                "message" => entry.message = Some(LogValue::from(value)),
                "additional" => {
                    entry.additional = match value {
                        Value::String(s) => Some(Additional::Text(s)),
                        Value::Array(items) => Some(Additional::Lines(
                            items
                                .into_iter()
                                .map(|v| LogValue::from(v).to_text(true))
                                .collect(),
                        )),
                        _ => None,
                    }
                }
                "args" => {
                    entry.args = match value {
                        Value::Array(items) => Some(items.into_iter().map(LogValue::from).collect()),
                        other => Some(vec![LogValue::from(other)]),
                    }
                }
                "date" | "timestamp" => {
                    entry.timestamp = value
                        .as_str()
                        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                        .map(|dt| dt.with_timezone(&Utc))
                }
                "title" => entry.title = value.as_str().map(String::from),
                "icon" => entry.icon = value.as_str().map(String::from),
                "badge" => entry.badge = value.as_bool(),
                _ => {
                    entry.extra.insert(key, value);
                }
            }
        }
        entry
    }
}

/// How the arguments of one call are interpreted, decided once at the call
/// boundary
#[derive(Debug, Clone, PartialEq)]
pub enum LogCall {
    Entry(PartialLogEntry),
    Args(Vec<LogValue>),
}

impl LogCall {
    /// Classify raw call arguments.
    ///
    /// A single plain object passing [`PartialLogEntry::is_log_object`] is
    /// merged as a record unless `raw` is set.
    pub fn classify(mut args: Vec<LogValue>, raw: bool) -> Self {
        if !raw && args.len() == 1 {
            if let Some(LogValue::Json(Value::Object(map))) = args.first() {
                if PartialLogEntry::is_log_object(map) {
                    if let Some(LogValue::Json(Value::Object(map))) = args.pop() {
                        return LogCall::Entry(PartialLogEntry::from_object(map));
                    }
                }
            }
        }
        LogCall::Args(args)
    }
}

/// Instance-wide default attributes merged into every entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogDefaults {
    /// Overlay `other` on top of `self`
    pub fn merged(&self, other: &LogDefaults) -> LogDefaults {
        let mut extra = self.extra.clone();
        extra.extend(other.extra.clone());
        LogDefaults {
            tag: other.tag.clone().or_else(|| self.tag.clone()),
            title: other.title.clone().or_else(|| self.title.clone()),
            icon: other.icon.clone().or_else(|| self.icon.clone()),
            badge: other.badge.or(self.badge),
            extra,
        }
    }
}

/// A normalized log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Lower-cased kind name
    pub kind: String,
    /// Possibly empty
    pub tag: String,
    pub args: Vec<LogValue>,
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<bool>,
    pub extra: Map<String, Value>,
}

impl LogEntry {
    pub fn new(kind: impl Into<String>, level: LogLevel, args: Vec<LogValue>) -> Self {
        Self {
            level,
            kind: kind.into().to_lowercase(),
            tag: String::new(),
            args,
            timestamp: Utc::now(),
            title: None,
            icon: None,
            badge: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build a normalized entry for `kind` from its defaults and the call.
    ///
    /// `message` is moved to the front of the arguments and `additional`
    /// is appended newline-joined.
    pub fn build(
        kind: &str,
        kind_type: &LogType,
        defaults: &LogDefaults,
        types: &LogTypes,
        call: LogCall,
        now: DateTime<Utc>,
    ) -> Self {
        let level = kind_type.level.unwrap_or(LogLevel::INFO);
        let mut entry = Self {
            level,
            kind: kind.to_lowercase(),
            tag: kind_type
                .tag
                .clone()
                .or_else(|| defaults.tag.clone())
                .unwrap_or_default(),
            args: Vec::new(),
            timestamp: now,
            title: defaults.title.clone(),
            icon: kind_type.icon.clone().or_else(|| defaults.icon.clone()),
            badge: kind_type.badge.or(defaults.badge),
            extra: defaults.extra.clone(),
        };

        match call {
            LogCall::Args(args) => entry.args = args,
            LogCall::Entry(partial) => entry.merge(partial, types),
        }
        entry
    }

    fn merge(&mut self, partial: PartialLogEntry, types: &LogTypes) {
        if partial.level.is_some() {
            self.level = types.normalize_level(partial.level.as_ref(), self.level);
        }
        if let Some(kind) = partial.kind {
            self.kind = kind.to_lowercase();
        }
        if let Some(tag) = partial.tag {
            self.tag = tag;
        }
        if let Some(timestamp) = partial.timestamp {
            self.timestamp = timestamp;
        }
        if partial.title.is_some() {
            self.title = partial.title;
        }
        if partial.icon.is_some() {
            self.icon = partial.icon;
        }
        if partial.badge.is_some() {
            self.badge = partial.badge;
        }
        self.extra.extend(partial.extra);

        self.args = partial.args.unwrap_or_default();
        if let Some(message) = partial.message {
            self.args.insert(0, message);
        }
        if let Some(additional) = partial.additional {
            let lines = additional.into_lines();
            self.args.push(LogValue::Str(format!("\n{}", lines.join("\n"))));
        }
    }

    /// First argument as text, used as the message of trace entries
    pub fn message(&self) -> String {
        self.args
            .first()
            .map(|arg| arg.to_text(true))
            .unwrap_or_default()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Serialized `(kind, tag, args)` key used to detect duplicates.
    ///
    /// Error arguments contribute their name, message and causes but not
    /// their stack, so repeats of one failure raised from different call
    /// paths (or `trace` records, which capture a fresh stack) collapse.
    pub fn fingerprint(&self) -> super::error::Result<String> {
        Ok(serde_json::to_string(&(&self.kind, &self.tag, &self.args))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_ignores_error_stacks() {
        let entry = |stack: &str| {
            LogEntry::new(
                "error",
                LogLevel::ERROR,
                vec![ErrorValue::new("timeout").with_stack(stack).into()],
            )
        };
        let a = entry("Error: timeout\n    at poll (a.rs:1:1)");
        let b = entry("Error: timeout\n    at retry (b.rs:7:2)");
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

        let other = LogEntry::new("error", LogLevel::ERROR, vec![ErrorValue::new("refused").into()]);
        assert_ne!(a.fingerprint().unwrap(), other.fingerprint().unwrap());
    }

    fn build(call: LogCall) -> LogEntry {
        let types = LogTypes::default();
        LogEntry::build(
            "info",
            types.get("info").unwrap(),
            &LogDefaults::default(),
            &types,
            call,
            Utc::now(),
        )
    }

    #[test]
    fn test_plain_args() {
        let entry = build(LogCall::classify(vec!["hello".into(), 42.into()], false));
        assert_eq!(entry.kind, "info");
        assert_eq!(entry.level, LogLevel::INFO);
        assert_eq!(entry.tag, "");
        assert_eq!(entry.args, vec![LogValue::from("hello"), LogValue::from(42)]);
    }

    #[test]
    fn test_structural_detection_merges_object() {
        let object = json!({"message": "deploy finished", "tag": "ci", "additional": "a\nb"});
        let call = LogCall::classify(vec![object.into()], false);
        assert!(matches!(call, LogCall::Entry(_)));

        let entry = build(call);
        assert_eq!(entry.tag, "ci");
        assert_eq!(entry.args.len(), 2);
        assert_eq!(entry.args[0], LogValue::from("deploy finished"));
        assert_eq!(entry.args[1], LogValue::from("\na\nb"));
    }

    #[test]
    fn test_stack_field_keeps_object_literal() {
        let object = json!({"message": "boom", "stack": "Error: boom\n    at main"});
        let call = LogCall::classify(vec![object.clone().into()], false);
        assert_eq!(call, LogCall::Args(vec![LogValue::Json(object)]));
    }

    #[test]
    fn test_raw_skips_detection() {
        let object = json!({"message": "as is"});
        let call = LogCall::classify(vec![object.clone().into()], true);
        assert_eq!(call, LogCall::Args(vec![LogValue::Json(object)]));
    }

    #[test]
    fn test_object_without_message_or_args_is_literal() {
        let object = json!({"user": "alice"});
        let call = LogCall::classify(vec![object.into()], false);
        assert!(matches!(call, LogCall::Args(_)));
    }

    #[test]
    fn test_merge_level_kind_and_extra_fields() {
        let partial = PartialLogEntry::new()
            .message("custom")
            .level("debug")
            .kind("NOTICE")
            .args(vec!["tail".into()])
            .additional(Additional::Lines(vec!["x".into(), "y".into()]))
            .field("style", json!({"borderColor": "red"}));
        let entry = build(LogCall::Entry(partial));

        assert_eq!(entry.level, LogLevel::DEBUG);
        assert_eq!(entry.kind, "notice");
        assert_eq!(
            entry.args,
            vec![LogValue::from("custom"), LogValue::from("tail"), LogValue::from("\nx\ny")]
        );
        assert_eq!(entry.field("style").unwrap()["borderColor"], "red");
    }

    #[test]
    fn test_defaults_and_kind_attributes() {
        let types = LogTypes::default().with_type("alert", LogType::new(LogLevel::ERROR).with_icon("!"));
        let defaults = LogDefaults {
            tag: Some("api".to_string()),
            ..LogDefaults::default()
        };
        let entry = LogEntry::build(
            "alert",
            types.get("alert").unwrap(),
            &defaults,
            &types,
            LogCall::Args(vec![]),
            Utc::now(),
        );
        assert_eq!(entry.tag, "api");
        assert_eq!(entry.icon.as_deref(), Some("!"));
        assert_eq!(entry.level, LogLevel::ERROR);
    }

    #[test]
    fn test_fingerprint() {
        let a = LogEntry::new("info", LogLevel::INFO, vec!["same".into()]);
        let b = LogEntry::new("info", LogLevel::INFO, vec!["same".into()]);
        let c = LogEntry::new("info", LogLevel::INFO, vec!["other".into()]);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());

        let opaque = LogEntry::new("info", LogLevel::INFO, vec![LogValue::opaque(vec![1, 2])]);
        assert!(opaque.fingerprint().is_err());
    }

    #[test]
    fn test_error_value_from_std_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing config");
        let value = ErrorValue::from_error(&io);
        assert_eq!(value.message, "missing config");
        assert_eq!(value.header(), "Error: missing config");
        assert!(value.cause.is_none());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(LogValue::from(json!({"a": 1})).to_text(true), r#"{"a":1}"#);
        assert!(LogValue::from(json!({"a": 1})).to_text(false).contains('\n'));
        assert_eq!(LogValue::from(true).to_text(true), "true");
        assert_eq!(LogValue::from(json!(null)).to_text(true), "null");
        assert_eq!(LogValue::opaque(7u8).to_text(true), "7");
    }
}
