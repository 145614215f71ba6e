//! Bordered box drawing
//!
//! ```text
//!  ╭──────────╮
//!  │          │
//!  │  Hello!  │
//!  │          │
//!  ╰──────────╯
//! ```

use super::color::Palette;
use super::string::visible_width;
use serde::{Deserialize, Serialize};

/// Border glyph set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxChars {
    pub tl: String,
    pub tr: String,
    pub bl: String,
    pub br: String,
    pub h: String,
    pub v: String,
}

impl BoxChars {
    fn of(glyphs: [&str; 6]) -> Self {
        let [tl, tr, bl, br, h, v] = glyphs;
        Self {
            tl: tl.to_string(),
            tr: tr.to_string(),
            bl: bl.to_string(),
            br: br.to_string(),
            h: h.to_string(),
            v: v.to_string(),
        }
    }

    /// A preset by name; unknown names resolve to `solid`
    pub fn preset(name: &str) -> Self {
        match name {
            "double" => Self::of(["╔", "╗", "╚", "╝", "═", "║"]),
            "doubleSingle" => Self::of(["╓", "╖", "╙", "╜", "─", "║"]),
            "doubleSingleRounded" => Self::of(["╭", "╮", "╰", "╯", "─", "║"]),
            "singleThick" => Self::of(["┏", "┓", "┗", "┛", "━", "┃"]),
            "singleDouble" => Self::of(["╒", "╕", "╘", "╛", "═", "│"]),
            "singleDoubleRounded" => Self::of(["╭", "╮", "╰", "╯", "═", "│"]),
            "rounded" => Self::of(["╭", "╮", "╰", "╯", "─", "│"]),
            _ => Self::of(["┌", "┐", "└", "┘", "─", "│"]),
        }
    }

    fn painted(&self, palette: &Palette, color: Option<&str>) -> Self {
        match color {
            Some(color) if palette.enabled() => Self {
                tl: palette.paint(color, &self.tl),
                tr: palette.paint(color, &self.tr),
                bl: palette.paint(color, &self.bl),
                br: palette.paint(color, &self.br),
                h: palette.paint(color, &self.h),
                v: palette.paint(color, &self.v),
            },
            _ => self.clone(),
        }
    }
}

/// A named preset or a literal glyph set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderStyle {
    Named(String),
    Custom(BoxChars),
}

impl BorderStyle {
    pub fn chars(&self) -> BoxChars {
        match self {
            BorderStyle::Named(name) => BoxChars::preset(name),
            BorderStyle::Custom(chars) => chars.clone(),
        }
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::Named("rounded".to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxStyle {
    pub border_color: Option<String>,
    pub border_style: BorderStyle,
    pub valign: VerticalAlign,
    pub padding: usize,
    pub margin_left: usize,
    pub margin_top: usize,
    pub margin_bottom: usize,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            border_color: Some("white".to_string()),
            border_style: BorderStyle::default(),
            valign: VerticalAlign::Center,
            padding: 2,
            margin_left: 1,
            margin_top: 1,
            margin_bottom: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxOptions {
    pub title: Option<String>,
    pub style: BoxStyle,
}

/// Computed box geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    /// Padding rounded up to even
    pub padding: usize,
    /// Widest text line (or title) plus padding
    pub width: usize,
    /// Columns between the two vertical borders
    pub inner_width: usize,
    /// Rows between the two horizontal borders
    pub height: usize,
    /// Blank rows above the text
    pub offset: usize,
}

impl BoxLayout {
    pub fn compute(lines: &[&str], title: Option<&str>, style: &BoxStyle) -> Self {
        let padding = if style.padding % 2 == 0 {
            style.padding
        } else {
            style.padding + 1
        };
        let widest = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let title_width = title.map(visible_width).unwrap_or(0);
        let width = widest.max(title_width) + padding;
        let height = lines.len() + padding;
        let offset = match style.valign {
            VerticalAlign::Top => 0,
            VerticalAlign::Center => (height - lines.len()) / 2,
            VerticalAlign::Bottom => height - lines.len(),
        };
        Self {
            padding,
            width,
            inner_width: width + padding,
            height,
            offset,
        }
    }
}

/// Draw `text` inside a border
pub fn render_box(text: &str, options: &BoxOptions, palette: &Palette) -> String {
    let style = &options.style;
    let lines: Vec<&str> = text.split('\n').collect();
    let title = options.title.as_deref().filter(|t| !t.is_empty());
    let layout = BoxLayout::compute(&lines, title, style);
    let chars = style
        .border_style
        .chars()
        .painted(palette, style.border_color.as_deref());

    let margin = " ".repeat(style.margin_left);
    let mut out: Vec<String> = Vec::with_capacity(layout.height + 2 + style.margin_top + style.margin_bottom);

    out.extend(std::iter::repeat(String::new()).take(style.margin_top));

    match title {
        Some(title) => {
            let title_width = visible_width(title);
            let free = layout.inner_width.saturating_sub(title_width);
            let left = free / 2;
            let right = free - left;
            let shown = match style.border_color.as_deref() {
                Some(color) => palette.paint(color, title),
                None => title.to_string(),
            };
            out.push(format!(
                "{}{}{}{}{}{}",
                margin,
                chars.tl,
                chars.h.repeat(left),
                shown,
                chars.h.repeat(right),
                chars.tr
            ));
        }
        None => out.push(format!(
            "{}{}{}{}",
            margin,
            chars.tl,
            chars.h.repeat(layout.inner_width),
            chars.tr
        )),
    }

    for row in 0..layout.height {
        if row < layout.offset || row >= layout.offset + lines.len() {
            out.push(format!(
                "{}{}{}{}",
                margin,
                chars.v,
                " ".repeat(layout.inner_width),
                chars.v
            ));
        } else {
            let line = lines[row - layout.offset];
            let right = layout.width - visible_width(line);
            out.push(format!(
                "{}{}{}{}{}{}",
                margin,
                chars.v,
                " ".repeat(layout.padding),
                line,
                " ".repeat(right),
                chars.v
            ));
        }
    }

    out.push(format!(
        "{}{}{}{}",
        margin,
        chars.bl,
        chars.h.repeat(layout.inner_width),
        chars.br
    ));

    out.extend(std::iter::repeat(String::new()).take(style.margin_bottom));

    out.join("\n")
}
