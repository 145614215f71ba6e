//! Plain-text renderer
//!
//! ```text
//! [warn] [db] slow query 1200ms
//! ```

use super::format::{format_args, PlainStack};
use crate::core::{FormatOptions, LogEntry, RenderContext, Renderer, Result};
use crate::utils::string::join_non_empty;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer;

impl BasicRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Text for one entry, without the trailing newline
    pub fn format_entry(&self, entry: &LogEntry, options: &FormatOptions) -> String {
        let message = format_args(&entry.args, options, &PlainStack);

        if entry.kind == "box" {
            let mut lines: Vec<String> = Vec::new();
            lines.extend(bracket(&entry.tag));
            lines.extend(entry.title.iter().filter(|t| !t.is_empty()).cloned());
            lines.extend(message.split('\n').filter(|l| !l.is_empty()).map(String::from));
            let quoted: Vec<String> = lines.iter().map(|l| format!(" > {}", l)).collect();
            return format!("\n{}\n", quoted.join("\n"));
        }

        join_non_empty(&[
            bracket(&entry.kind).unwrap_or_default(),
            bracket(&entry.tag).unwrap_or_default(),
            message,
        ])
    }
}

fn bracket(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(format!("[{}]", text))
    }
}

impl Renderer for BasicRenderer {
    fn render(&self, entry: &LogEntry, ctx: &RenderContext) -> Result<()> {
        let line = self.format_entry(entry, &ctx.resolved_options());
        ctx.stream_for(entry.level).write_line(&line)
    }

    fn name(&self) -> &str {
        "basic"
    }
}
