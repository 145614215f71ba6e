//! Argument and error formatting shared by the built-in renderers

use crate::core::{ErrorValue, FormatOptions, LogValue};
use crate::utils::stack::parse_stack;

/// How a renderer lays out the frames of a stack
pub trait StackStyle {
    fn format_stack(&self, stack: &str, message: &str, options: &FormatOptions) -> String;
}

/// Frames one per line, indented two spaces deeper than the error's nesting level
pub struct PlainStack;

impl StackStyle for PlainStack {
    fn format_stack(&self, stack: &str, message: &str, options: &FormatOptions) -> String {
        let frames = parse_stack(stack, message);
        if frames.is_empty() {
            return String::new();
        }
        let indent = "  ".repeat(options.error_level + 1);
        frames
            .iter()
            .map(|frame| format!("{}{}", indent, frame))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Join the arguments with spaces, expanding errors
pub fn format_args(args: &[LogValue], options: &FormatOptions, stacks: &dyn StackStyle) -> String {
    args.iter()
        .map(|arg| match arg {
            LogValue::Error(err) => format_error(err, options, stacks),
            other => other.to_text(options.compact),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Message line, stack block and nested causes of an error.
///
/// Causes are separated by a blank line and prefixed with `[cause]:`
/// indented two spaces per nesting level.
pub fn format_error(err: &ErrorValue, options: &FormatOptions, stacks: &dyn StackStyle) -> String {
    let mut text = String::new();
    if options.error_level > 0 {
        text.push_str(&"  ".repeat(options.error_level));
        text.push_str("[cause]: ");
    }
    text.push_str(&err.message);

    if let Some(stack) = err.stack.as_deref() {
        let formatted = stacks.format_stack(stack, &err.message, options);
        if !formatted.is_empty() {
            text.push('\n');
            text.push_str(&formatted);
        }
    }

    if let Some(cause) = err.cause.as_deref() {
        text.push_str("\n\n");
        text.push_str(&format_error(cause, &options.nested(), stacks));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_args_joins_with_spaces() {
        let options = FormatOptions::default();
        let args = vec![LogValue::from("count:"), LogValue::from(3), LogValue::from(json!({"a": [1, 2]}))];
        assert_eq!(format_args(&args, &options, &PlainStack), r#"count: 3 {"a":[1,2]}"#);
    }

    #[test]
    fn test_pretty_json_when_not_compact() {
        let options = FormatOptions {
            compact: false,
            ..FormatOptions::default()
        };
        let text = format_args(&[LogValue::from(json!({"a": 1}))], &options, &PlainStack);
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_error_with_stack_and_cause() {
        let root = ErrorValue::new("disk full").with_stack("Error: disk full\n    at write (io.rs:1:1)");
        let err = ErrorValue::new("save failed")
            .with_stack("Error: save failed\n    at save (app.rs:9:3)\n    at main (app.rs:20:1)")
            .with_cause(root);

        let text = format_error(&err, &FormatOptions::default(), &PlainStack);
        assert_eq!(
            text,
            "save failed\n  at save (app.rs:9:3)\n  at main (app.rs:20:1)\n\n  [cause]: disk full\n    at write (io.rs:1:1)"
        );
    }

    #[test]
    fn test_error_without_stack() {
        let err = ErrorValue::new("plain");
        assert_eq!(format_error(&err, &FormatOptions::default(), &PlainStack), "plain");
    }
}
