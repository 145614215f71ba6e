//! Stack-trace capture and cleaning

use std::backtrace::Backtrace;

/// Capture the current call stack as `at symbol (location)` frames
pub fn capture_frames() -> Vec<String> {
    let rendered = Backtrace::force_capture().to_string();
    parse_backtrace(&rendered)
        .into_iter()
        .filter(|frame| !is_internal_frame(frame))
        .collect()
}

fn is_internal_frame(frame: &str) -> bool {
    frame.contains("std::backtrace")
        || frame.contains("utils::stack::capture_frames")
        || frame.contains("ErrorValue::capture")
}

/// Convert `std::backtrace` output into `at symbol (location)` lines
fn parse_backtrace(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    let mut symbol: Option<String> = None;

    let mut finish = |symbol: &mut Option<String>, location: Option<&str>| {
        if let Some(name) = symbol.take() {
            frames.push(match location {
                Some(location) => format!("at {} ({})", name, location),
                None => format!("at {}", name),
            });
        }
    };

    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            finish(&mut symbol, Some(location));
        } else if let Some((index, name)) = line.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) {
                finish(&mut symbol, None);
                symbol = Some(name.to_string());
            }
        }
    }
    finish(&mut symbol, None);
    frames
}

/// Stack text in the `header` + indented frames layout
pub fn compose_stack(header: &str, frames: &[String]) -> String {
    let mut stack = header.to_string();
    for frame in frames {
        stack.push_str("\n    ");
        stack.push_str(frame);
    }
    stack
}

/// Frames of `stack` with the header lines dropped.
///
/// The header spans as many lines as `message`. Frames are trimmed, and the
/// `file://` scheme and the current working directory are removed.
pub fn parse_stack(stack: &str, message: &str) -> Vec<String> {
    let skip = message.split('\n').count();
    let cwd = std::env::current_dir()
        .ok()
        .map(|dir| format!("{}{}", dir.display(), std::path::MAIN_SEPARATOR));

    stack
        .split('\n')
        .skip(skip)
        .map(|line| {
            let cleaned = line.trim().replace("file://", "");
            match cwd {
                Some(ref cwd) => cleaned.replace(cwd.as_str(), ""),
                None => cleaned,
            }
        })
        .collect()
}
