//! Built-in renderers

pub mod basic;
pub mod fancy;
pub mod format;

pub use basic::BasicRenderer;
pub use fancy::{character_format, unicode_supported, FancyRenderer};
pub use format::{format_args, format_error, PlainStack, StackStyle};
