//! Renderer trait and the context handed to every render call

use super::{
    error::Result, log_entry::LogEntry, log_level::LogLevel, output::OutputStream,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};

/// Turns one entry into text and writes it to the stream chosen from the
/// render context.
///
/// Renderers are shared between a logger and its children, so `render`
/// takes `&self`. A renderer must not log through the logger that invoked
/// it: the dispatch lock is held while rendering.
pub trait Renderer: Send + Sync {
    fn render(&self, entry: &LogEntry, ctx: &RenderContext) -> Result<()>;
    fn name(&self) -> &str;
}

/// Layout switches shared by the built-in renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Show entry timestamps
    pub date: bool,
    pub colors: bool,
    /// Single-line JSON for structured arguments
    pub compact: bool,
    /// Overrides the width reported by the output stream
    pub columns: Option<usize>,
    pub timestamp_format: TimestampFormat,
    /// Nesting depth of the error being formatted
    pub error_level: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            date: true,
            colors: false,
            compact: true,
            columns: None,
            timestamp_format: TimestampFormat::default(),
            error_level: 0,
        }
    }
}

impl FormatOptions {
    /// A copy one error-nesting level deeper
    pub fn nested(&self) -> Self {
        Self {
            error_level: self.error_level + 1,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub options: FormatOptions,
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl RenderContext {
    pub fn new(options: FormatOptions, stdout: OutputStream, stderr: OutputStream) -> Self {
        Self {
            options,
            stdout,
            stderr,
        }
    }

    /// Fatal, error and warn entries go to stderr
    pub fn stream_for(&self, level: LogLevel) -> &OutputStream {
        if level.is_stderr() {
            &self.stderr
        } else {
            &self.stdout
        }
    }

    /// Layout width: the configured override, else stdout's width, else 0
    pub fn columns(&self) -> usize {
        self.options
            .columns
            .or_else(|| self.stdout.columns())
            .unwrap_or(0)
    }

    /// Format options with the resolved column width filled in
    pub fn resolved_options(&self) -> FormatOptions {
        FormatOptions {
            columns: Some(self.columns()),
            ..self.options.clone()
        }
    }
}
