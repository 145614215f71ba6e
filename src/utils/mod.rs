//! Stateless text rendering helpers

pub mod boxes;
pub mod color;
pub mod stack;
pub mod string;
pub mod tree;

pub use boxes::{render_box, BorderStyle, BoxChars, BoxLayout, BoxOptions, BoxStyle, VerticalAlign};
pub use color::{colorize, Paint, Palette};
pub use stack::{capture_frames, compose_stack, parse_stack};
pub use string::{align, center_align, left_align, right_align, strip_ansi, visible_width, Alignment};
pub use tree::{format_tree, TreeItem, TreeOptions};
