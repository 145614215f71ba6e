//! Escape-aware string measurement and alignment

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"[\x1b\x{9b}][\[\]()#;?]*(?:(?:(?:(?:;[-a-zA-Z\d/#&.:=?%@~_]+)*|[a-zA-Z\d]+(?:;[-a-zA-Z\d/#&.:=?%@~_]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PR-TZcf-nq-uy=><~]))",
        )
        .expect("ANSI escape pattern is valid")
    })
}

/// Remove ANSI escape sequences
pub fn strip_ansi(text: &str) -> String {
    ansi_pattern().replace_all(text, "").into_owned()
}

/// Display width of `text` after stripping escape sequences.
///
/// Wide and zero-width characters are accounted for when the `unicode-width`
/// feature is enabled; otherwise every `char` counts as one column.
pub fn visible_width(text: &str) -> usize {
    let stripped = strip_ansi(text);
    display_width(&stripped)
}

#[cfg(feature = "unicode-width")]
fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(text)
}

#[cfg(not(feature = "unicode-width"))]
fn display_width(text: &str) -> usize {
    text.chars().count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

fn fill(space: &str, count: usize) -> String {
    space.repeat(count)
}

/// Center `text` within `len` columns
pub fn center_align(text: &str, len: usize, space: &str) -> String {
    let width = visible_width(text);
    if width >= len {
        return text.to_string();
    }
    let free = len - width;
    let left = free / 2;
    format!("{}{}{}", fill(space, left), text, fill(space, free - left))
}

/// Right-align `text` within `len` columns
pub fn right_align(text: &str, len: usize, space: &str) -> String {
    let width = visible_width(text);
    if width >= len {
        return text.to_string();
    }
    format!("{}{}", fill(space, len - width), text)
}

/// Left-align `text` within `len` columns
pub fn left_align(text: &str, len: usize, space: &str) -> String {
    let width = visible_width(text);
    if width >= len {
        return text.to_string();
    }
    format!("{}{}", text, fill(space, len - width))
}

pub fn align(alignment: Alignment, text: &str, len: usize, space: &str) -> String {
    match alignment {
        Alignment::Left => left_align(text, len, space),
        Alignment::Center => center_align(text, len, space),
        Alignment::Right => right_align(text, len, space),
    }
}

/// Join the non-empty parts with single spaces
pub fn join_non_empty<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
