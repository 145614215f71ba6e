//! Decorated renderer: colors, icons, badges, right-aligned metadata and boxes
//!
//! ```text
//! ℹ server listening on :8080                              api 10:30:45
//!
//!  WARN  disk usage at 91%
//!
//! ```

use super::format::{format_args, StackStyle};
use crate::core::{ErrorValue, FormatOptions, LogEntry, LogLevel, RenderContext, Renderer, Result};
use crate::utils::boxes::{render_box, BoxOptions, BoxStyle};
use crate::utils::color::Palette;
use crate::utils::stack::parse_stack;
use crate::utils::string::{join_non_empty, visible_width};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum terminal width for the right-aligned layout
pub const ALIGNED_LAYOUT_MIN_COLUMNS: usize = 80;

#[derive(Debug, Clone, Copy)]
pub struct FancyRenderer {
    unicode: bool,
}

impl FancyRenderer {
    /// Unicode icons when the environment supports them
    pub fn new() -> Self {
        Self {
            unicode: unicode_supported(),
        }
    }

    #[must_use]
    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    fn icon(&self, kind: &str) -> Option<&'static str> {
        let pick = |fancy: &'static str, ascii: &'static str| Some(if self.unicode { fancy } else { ascii });
        match kind {
            "error" | "fatal" | "fail" => pick("✖", "×"),
            "ready" | "success" => pick("✔", "√"),
            "warn" => pick("⚠", "‼"),
            "info" => pick("ℹ", "i"),
            "debug" => pick("⚙", "D"),
            "trace" => Some("→"),
            "start" => pick("◐", "o"),
            "log" => Some(""),
            _ => None,
        }
    }

    fn format_type(&self, entry: &LogEntry, badge: bool, palette: &Palette) -> String {
        let color = type_color(entry);
        if badge {
            let label = palette.paint("black", &format!(" {} ", entry.kind.to_uppercase()));
            return palette.background(color, &label);
        }
        let icon = entry
            .icon
            .as_deref()
            .or_else(|| self.icon(&entry.kind))
            .unwrap_or(entry.kind.as_str());
        palette.paint(color, icon)
    }

    /// Text for one entry, without the trailing newline
    pub fn format_entry(&self, entry: &LogEntry, options: &FormatOptions) -> String {
        let palette = Palette::new(options.colors);
        let stacks = FancyStack { palette };
        let formatted = format_args(&entry.args, options, &stacks);
        let mut lines = formatted.split('\n');
        let message = lines.next().unwrap_or_default();
        let additional: Vec<&str> = lines.collect();

        if entry.kind == "box" {
            let mut text = message.to_string();
            if !additional.is_empty() {
                text.push('\n');
                text.push_str(&additional.join("\n"));
            }
            let style = entry
                .field("style")
                .and_then(|style| serde_json::from_value::<BoxStyle>(style.clone()).ok())
                .unwrap_or_default();
            let box_options = BoxOptions {
                title: entry.title.as_deref().map(|t| character_format(t, &palette)),
                style,
            };
            return render_box(&character_format(&text, &palette), &box_options, &palette);
        }

        let date = if options.date {
            palette.paint("gray", &options.timestamp_format.format(&entry.timestamp))
        } else {
            String::new()
        };
        let badge = entry.badge.unwrap_or(entry.level < LogLevel::LOG);
        let kind = self.format_type(entry, badge, &palette);
        let tag = palette.paint("gray", &entry.tag);

        let columns = options.columns.unwrap_or(0);
        let left = join_non_empty(&[kind, character_format(message, &palette)]);
        let right = if columns > 0 {
            join_non_empty(&[tag, date])
        } else {
            join_non_empty(&[tag])
        };

        let space = columns as i64 - visible_width(&left) as i64 - visible_width(&right) as i64 - 2;
        let mut line = if space > 0 && columns >= ALIGNED_LAYOUT_MIN_COLUMNS {
            format!("{}{}{}", left, " ".repeat(space as usize), right)
        } else if right.is_empty() {
            left
        } else {
            format!("{} {}", palette.paint("gray", &format!("[{}]", right)), left)
        };

        if !additional.is_empty() {
            line.push_str(&character_format(&format!("\n{}", additional.join("\n")), &palette));
        }

        if entry.kind == "trace" {
            let err = ErrorValue::capture(format!("Trace: {}", entry.message()));
            if let Some(stack) = err.stack.as_deref() {
                let frames = stacks.format_stack(stack, &err.message, options);
                if !frames.is_empty() {
                    line.push('\n');
                    line.push_str(&frames);
                }
            }
        }

        if badge {
            format!("\n{}\n", line)
        } else {
            line
        }
    }
}

impl Default for FancyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for FancyRenderer {
    fn render(&self, entry: &LogEntry, ctx: &RenderContext) -> Result<()> {
        let line = self.format_entry(entry, &ctx.resolved_options());
        ctx.stream_for(entry.level).write_line(&line)
    }

    fn name(&self) -> &str {
        "fancy"
    }
}

fn type_color(entry: &LogEntry) -> &'static str {
    match entry.kind.as_str() {
        "info" => "cyan",
        "fail" => "red",
        "success" | "ready" => "green",
        "start" => "magenta",
        _ => match entry.level {
            LogLevel::Level(0) => "red",
            LogLevel::Level(1) => "yellow",
            _ => "gray",
        },
    }
}

/// Stack frames with a gray `at` and a cyan location, indented per error
/// nesting level
struct FancyStack {
    palette: Palette,
}

impl StackStyle for FancyStack {
    fn format_stack(&self, stack: &str, message: &str, options: &FormatOptions) -> String {
        let frames = parse_stack(stack, message);
        if frames.is_empty() {
            return String::new();
        }
        let indent = "  ".repeat(options.error_level + 1);
        let patterns = stack_patterns();
        frames
            .iter()
            .map(|frame| {
                let frame = patterns
                    .at
                    .replace(frame, |caps: &regex::Captures| self.palette.paint("gray", &caps[0]));
                let frame = patterns.location.replace(&frame, |caps: &regex::Captures| {
                    format!("({})", self.palette.paint("cyan", &caps[1]))
                });
                format!("{}  {}", indent, frame)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct StackPatterns {
    at: Regex,
    location: Regex,
}

fn stack_patterns() -> &'static StackPatterns {
    static PATTERNS: OnceLock<StackPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| StackPatterns {
        at: Regex::new(r"^at +").expect("stack prefix pattern is valid"),
        location: Regex::new(r"\((.+)\)").expect("stack location pattern is valid"),
    })
}

struct MarkupPatterns {
    code: Regex,
    emphasis: Regex,
}

fn markup_patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        code: Regex::new(r"`([^`]+)`").expect("code span pattern is valid"),
        emphasis: Regex::new(r"\s+_([^_]+)_\s+").expect("emphasis pattern is valid"),
    })
}

/// Inline markup: `` `code` `` in cyan, ` _word_ ` underlined
pub fn character_format(text: &str, palette: &Palette) -> String {
    let patterns = markup_patterns();
    let coded = patterns
        .code
        .replace_all(text, |caps: &regex::Captures| palette.paint("cyan", &caps[1]));
    patterns
        .emphasis
        .replace_all(&coded, |caps: &regex::Captures| {
            format!(" {} ", palette.paint("underline", &caps[1]))
        })
        .into_owned()
}

/// Whether the terminal is likely to render Unicode symbols
pub fn unicode_supported() -> bool {
    let var = |key: &str| std::env::var(key).ok();
    if !cfg!(windows) {
        return var("TERM").as_deref() != Some("linux");
    }
    var("WT_SESSION").is_some()
        || var("TERMINUS_SUBLIME").is_some()
        || var("ConEmuTask").as_deref() == Some("{cmd::Cmder}")
        || matches!(var("TERM_PROGRAM").as_deref(), Some("Terminus-Sublime") | Some("vscode"))
        || matches!(var("TERM").as_deref(), Some("xterm-256color") | Some("alacritty"))
        || var("TERMINAL_EMULATOR").as_deref() == Some("JetBrains-JediTerm")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogValue, OutputStream};
    use crate::utils::color::colorize;
    use crate::utils::string::strip_ansi;
    use serde_json::json;

    fn options(colors: bool, columns: Option<usize>) -> FormatOptions {
        FormatOptions {
            date: false,
            colors,
            columns,
            ..FormatOptions::default()
        }
    }

    fn info(text: &str) -> LogEntry {
        LogEntry::new("info", LogLevel::INFO, vec![text.into()])
    }

    #[test]
    fn test_nested_error_layout_matches_plain() {
        use crate::renderers::format::PlainStack;

        let root = ErrorValue::new("disk full").with_stack("Error: disk full\n    at write (io.rs:1:1)");
        let err = ErrorValue::new("save failed")
            .with_stack("Error: save failed\n    at save (app.rs:9:3)")
            .with_cause(root);
        let args = vec![LogValue::Error(err)];

        let plain = format_args(&args, &options(false, None), &PlainStack);
        let fancy = format_args(
            &args,
            &options(true, None),
            &FancyStack {
                palette: Palette::new(true),
            },
        );
        let fancy = strip_ansi(&fancy);

        assert!(plain.contains("\n    at write (io.rs:1:1)"));
        let plain_lines: Vec<&str> = plain.lines().collect();
        let fancy_lines: Vec<&str> = fancy.lines().collect();
        assert_eq!(plain_lines.len(), fancy_lines.len());
        for (p, f) in plain_lines.iter().zip(&fancy_lines) {
            if p.trim_start().starts_with("at ") {
                // decorated frames carry two extra spaces
                assert_eq!(*f, format!("  {}", p));
            } else {
                assert_eq!(f, p);
            }
        }
    }

    #[test]
    fn test_icon_and_message() {
        let renderer = FancyRenderer::new().with_unicode(true);
        assert_eq!(renderer.format_entry(&info("hello"), &options(false, None)), "ℹ hello");

        let ascii = FancyRenderer::new().with_unicode(false);
        assert_eq!(ascii.format_entry(&info("hello"), &options(false, None)), "i hello");

        let log = LogEntry::new("log", LogLevel::LOG, vec!["bare".into()]);
        assert_eq!(renderer.format_entry(&log, &options(false, None)), "bare");

        let custom = LogEntry::new("deploy", LogLevel::INFO, vec!["x".into()]);
        assert_eq!(renderer.format_entry(&custom, &options(false, None)), "deploy x");
    }

    #[test]
    fn test_colors_disabled_emits_no_escapes() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let entry = info("use `cargo` for _everything_ now").with_tag("build");
        let plain = renderer.format_entry(&entry, &options(false, Some(100)));
        assert_eq!(strip_ansi(&plain), plain);
    }

    #[test]
    fn test_stripped_colored_output_matches_plain_layout() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let entry = info("use `cargo` for _everything_ now").with_tag("build");
        for columns in [None, Some(60), Some(120)] {
            let colored = renderer.format_entry(&entry, &options(true, columns));
            let plain = renderer.format_entry(&entry, &options(false, columns));
            assert_ne!(colored, plain);
            assert_eq!(strip_ansi(&colored), plain);
        }
    }

    #[test]
    fn test_right_aligned_layout() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let entry = info("listening").with_tag("api");
        let line = renderer.format_entry(&entry, &options(false, Some(100)));
        assert!(line.starts_with("ℹ listening "));
        assert!(line.ends_with(" api"));
        assert_eq!(visible_width(&line), 98);
    }

    #[test]
    fn test_bracketed_tag_on_narrow_terminal() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let entry = info("listening").with_tag("api");
        assert_eq!(
            renderer.format_entry(&entry, &options(false, Some(40))),
            "[api] ℹ listening"
        );
        assert_eq!(
            renderer.format_entry(&entry, &options(false, None)),
            "[api] ℹ listening"
        );
    }

    #[test]
    fn test_date_only_with_columns() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let with_date = FormatOptions {
            date: true,
            ..options(false, Some(50))
        };
        let line = renderer.format_entry(&info("x"), &with_date);
        assert!(line.starts_with('['));

        let no_columns = FormatOptions {
            date: true,
            ..options(false, None)
        };
        assert_eq!(renderer.format_entry(&info("x"), &no_columns), "ℹ x");
    }

    #[test]
    fn test_badge_for_severe_levels() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let error = LogEntry::new("error", LogLevel::ERROR, vec!["broken".into()]);
        assert_eq!(
            renderer.format_entry(&error, &options(false, None)),
            "\n ERROR  broken\n"
        );

        let colored = renderer.format_entry(&error, &options(true, None));
        assert!(colored.contains(&colorize("bgRed", &colorize("black", " ERROR "))));

        let mut no_badge = error.clone();
        no_badge.badge = Some(false);
        assert_eq!(renderer.format_entry(&no_badge, &options(false, None)), "✖ broken");
    }

    #[test]
    fn test_inline_markup() {
        let palette = Palette::new(true);
        assert_eq!(
            character_format("run `make`", &palette),
            format!("run {}", colorize("cyan", "make"))
        );
        assert_eq!(
            character_format("a _b_ c", &palette),
            format!("a {} c", colorize("underline", "b"))
        );
        assert_eq!(character_format("run `make`", &Palette::new(false)), "run make");
        assert_eq!(character_format("snake_case_name", &palette), "snake_case_name");
    }

    #[test]
    fn test_box_kind() {
        let renderer = FancyRenderer::new();
        let mut entry = LogEntry::new("box", LogLevel::INFO, vec!["Hello!".into()]);
        entry.title = Some("Greeting".to_string());
        entry.extra.insert("style".to_string(), json!({"borderStyle": "double", "marginTop": 0}));
        let text = renderer.format_entry(&entry, &options(false, None));
        let first = text.lines().next().unwrap();
        assert!(first.trim_start().starts_with('╔'));
        assert!(first.contains("Greeting"));
    }

    #[test]
    fn test_trace_appends_stack() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let entry = LogEntry::new("trace", LogLevel::TRACE, vec!["here".into()]);
        let text = renderer.format_entry(&entry, &options(false, None));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("→ here"));
        assert!(lines.all(|l| l.starts_with("    at ")));
    }

    #[test]
    fn test_error_stack_styling() {
        let renderer = FancyRenderer::new().with_unicode(true);
        let err = ErrorValue::new("boom").with_stack("Error: boom\n    at main (src/main.rs:3:5)");
        let entry = LogEntry::new("log", LogLevel::LOG, vec![LogValue::from(err)]);

        let plain = renderer.format_entry(&entry, &options(false, None));
        assert_eq!(plain, "boom\n    at main (src/main.rs:3:5)");

        let colored = renderer.format_entry(&entry, &options(true, None));
        assert!(colored.contains(&colorize("cyan", "src/main.rs:3:5")));
        assert!(colored.contains(&colorize("gray", "at ")));
    }

    #[test]
    fn test_render_writes_to_stream() {
        let (stdout, out) = OutputStream::memory();
        let (stderr, _) = OutputStream::memory();
        let ctx = RenderContext::new(options(false, None), stdout, stderr);
        FancyRenderer::new()
            .with_unicode(false)
            .render(&info("ok"), &ctx)
            .unwrap();
        assert_eq!(out.contents(), "i ok\n");
    }
}
