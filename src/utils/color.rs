//! ANSI color composition
//!
//! Colors are looked up by name (`red`, `gray`, `cyanBright`, `bgYellow`,
//! `underline`, ...) and applied as an open/close escape pair. Nested
//! styling keeps working because every close sequence of the same attribute
//! inside the text is followed by the outer open sequence again.

use colored::Color;
use std::borrow::Cow;

/// One ANSI attribute: a foreground or background color, or a modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fg(Color),
    Bg(Color),
    Bold,
    Dim,
    Italic,
    Underline,
    Inverse,
    Hidden,
    Strikethrough,
    Reset,
}

impl Paint {
    /// Look up a paint by name
    pub fn from_name(name: &str) -> Option<Paint> {
        let paint = match name {
            "reset" => Paint::Reset,
            "bold" => Paint::Bold,
            "dim" => Paint::Dim,
            "italic" => Paint::Italic,
            "underline" => Paint::Underline,
            "inverse" => Paint::Inverse,
            "hidden" => Paint::Hidden,
            "strikethrough" => Paint::Strikethrough,
            _ => {
                if let Some(bg) = name.strip_prefix("bg") {
                    let mut chars = bg.chars();
                    let first = chars.next()?;
                    let lowered = format!("{}{}", first.to_ascii_lowercase(), chars.as_str());
                    return color_by_name(&lowered).map(Paint::Bg);
                }
                return color_by_name(name).map(Paint::Fg);
            }
        };
        Some(paint)
    }

    fn open(&self) -> Cow<'static, str> {
        match self {
            Paint::Fg(color) => Cow::Owned(format!("\x1b[{}m", color.to_fg_str())),
            Paint::Bg(color) => Cow::Owned(format!("\x1b[{}m", color.to_bg_str())),
            Paint::Bold => Cow::Borrowed("\x1b[1m"),
            Paint::Dim => Cow::Borrowed("\x1b[2m"),
            Paint::Italic => Cow::Borrowed("\x1b[3m"),
            Paint::Underline => Cow::Borrowed("\x1b[4m"),
            Paint::Inverse => Cow::Borrowed("\x1b[7m"),
            Paint::Hidden => Cow::Borrowed("\x1b[8m"),
            Paint::Strikethrough => Cow::Borrowed("\x1b[9m"),
            Paint::Reset => Cow::Borrowed("\x1b[0m"),
        }
    }

    fn close(&self) -> &'static str {
        match self {
            Paint::Fg(_) => "\x1b[39m",
            Paint::Bg(_) => "\x1b[49m",
            Paint::Bold | Paint::Dim => "\x1b[22m",
            Paint::Italic => "\x1b[23m",
            Paint::Underline => "\x1b[24m",
            Paint::Inverse => "\x1b[27m",
            Paint::Hidden => "\x1b[28m",
            Paint::Strikethrough => "\x1b[29m",
            Paint::Reset => "\x1b[0m",
        }
    }

    /// Wrap `text` in this attribute
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let open = self.open();
        let close = self.close();
        let reopen = format!("{}{}", close, open);
        let inner = if matches!(self, Paint::Reset) {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.replace(close, &reopen))
        };
        format!("{}{}{}", open, inner, close)
    }
}

fn color_by_name(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "blackBright" => Color::BrightBlack,
        "redBright" => Color::BrightRed,
        "greenBright" => Color::BrightGreen,
        "yellowBright" => Color::BrightYellow,
        "blueBright" => Color::BrightBlue,
        "magentaBright" => Color::BrightMagenta,
        "cyanBright" => Color::BrightCyan,
        "whiteBright" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Colorize `text` with the named color, or return it unchanged for
/// unknown names
pub fn colorize(name: &str, text: &str) -> String {
    match Paint::from_name(name) {
        Some(paint) => paint.apply(text),
        None => text.to_string(),
    }
}

/// Colorization that can be switched off as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Apply the named color, falling back to `fallback` for unknown names
    pub fn paint(&self, name: &str, text: &str) -> String {
        self.paint_or(name, "white", text)
    }

    pub fn paint_or(&self, name: &str, fallback: &str, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match Paint::from_name(name).or_else(|| Paint::from_name(fallback)) {
            Some(paint) => paint.apply(text),
            None => text.to_string(),
        }
    }

    /// Apply several attributes, innermost first
    pub fn paint_all(&self, names: &[&str], text: &str) -> String {
        names
            .iter()
            .fold(text.to_string(), |acc, name| self.paint(name, &acc))
    }

    /// Background variant of a foreground color name (`red` → `bgRed`)
    pub fn background(&self, name: &str, text: &str) -> String {
        let mut chars = name.chars();
        let bg_name = match chars.next() {
            Some(first) => format!("bg{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "bgWhite".to_string(),
        };
        self.paint_or(&bg_name, "bgWhite", text)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(true)
    }
}
