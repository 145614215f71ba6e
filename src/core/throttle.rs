//! Duplicate suppression
//!
//! [`ThrottleState`] is the per-logger memory of the last rendered entry. For
//! every dispatched entry it decides whether the entry renders now or is
//! absorbed as a repeat, and it produces the pending-repeat flush that must
//! render before the next distinct entry or when the deferred timer fires.
//!
//! Repeat counting starts at 1 for the first occurrence of a fingerprint, so
//! with `min_repeats = 5` the first five identical entries inside the window
//! render individually and the sixth onward are absorbed. A flush re-renders
//! the last rendered entry once, annotated with the number of absorbed
//! repeats when more than one was absorbed.

use super::log_entry::{LogEntry, LogValue};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default throttle window
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(1000);

/// Default number of identical entries rendered before suppression
pub const DEFAULT_THROTTLE_MIN_REPEATS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Entries further apart than this are never considered duplicates
    pub window: Duration,
    /// Identical entries rendered individually before suppression starts
    pub min_repeats: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_THROTTLE_WINDOW,
            min_repeats: DEFAULT_THROTTLE_MIN_REPEATS,
        }
    }
}

/// Outcome of observing one entry
#[derive(Debug, Clone, PartialEq)]
pub enum ThrottleDecision {
    /// Absorb the entry and (re)arm the deferred flush
    Suppress,
    /// Render the entry, after `flush` if one is pending
    Render { flush: Option<LogEntry> },
}

#[derive(Debug, Default)]
pub struct ThrottleState {
    last_entry: Option<LogEntry>,
    fingerprint: Option<String>,
    repeat_count: u32,
    last_time: Option<DateTime<Utc>>,
}

impl ThrottleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what happens to `entry`.
    ///
    /// On [`ThrottleDecision::Render`] the caller renders the flush (if any),
    /// then the entry, then calls [`commit`](Self::commit).
    pub fn observe(&mut self, entry: &LogEntry, config: &ThrottleConfig) -> ThrottleDecision {
        let elapsed = self
            .last_time
            .map(|last| (entry.timestamp - last).to_std().unwrap_or(Duration::ZERO))
            .unwrap_or(Duration::ZERO);
        self.last_time = Some(entry.timestamp);

        let fingerprint = entry.fingerprint().ok();

        if elapsed < config.window {
            if let Some(ref current) = fingerprint {
                if self.fingerprint.as_deref() == Some(current.as_str()) {
                    self.repeat_count += 1;
                    if self.repeat_count > config.min_repeats {
                        return ThrottleDecision::Suppress;
                    }
                    return ThrottleDecision::Render {
                        flush: self.take_pending(config),
                    };
                }
            }
        }

        // Distinct entry, unfingerprintable entry, or outside the window
        let flush = self.take_pending(config);
        self.fingerprint = fingerprint;
        self.repeat_count = 1;
        ThrottleDecision::Render { flush }
    }

    /// Remember `entry` as the last rendered entry
    pub fn commit(&mut self, entry: LogEntry) {
        self.last_entry = Some(entry);
    }

    /// The flush of accumulated repeats, if any are pending.
    ///
    /// Resets the repeat count to 1 when a flush is produced.
    pub fn take_pending(&mut self, config: &ThrottleConfig) -> Option<LogEntry> {
        let repeated = self.repeat_count.saturating_sub(config.min_repeats);
        if repeated == 0 {
            return None;
        }
        let last = self.last_entry.as_ref()?;
        let mut flushed = last.clone();
        if repeated > 1 {
            flushed
                .args
                .push(LogValue::Str(format!("(repeated {} times)", repeated)));
        }
        self.repeat_count = 1;
        Some(flushed)
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn has_pending(&self, config: &ThrottleConfig) -> bool {
        self.last_entry.is_some() && self.repeat_count > config.min_repeats
    }

    pub fn last_entry(&self) -> Option<&LogEntry> {
        self.last_entry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::TimeZone;

    fn at(ms: i64, text: &str) -> LogEntry {
        let base = Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).single().unwrap();
        LogEntry::new("info", LogLevel::INFO, vec![text.into()])
            .with_timestamp(base + chrono::Duration::milliseconds(ms))
    }

    /// Feed entries and collect what would be rendered, in order
    fn run(state: &mut ThrottleState, config: &ThrottleConfig, entries: Vec<LogEntry>) -> Vec<String> {
        let mut rendered = Vec::new();
        for entry in entries {
            match state.observe(&entry, config) {
                ThrottleDecision::Suppress => {}
                ThrottleDecision::Render { flush } => {
                    if let Some(flushed) = flush {
                        rendered.push(render_text(&flushed));
                    }
                    rendered.push(render_text(&entry));
                    state.commit(entry);
                }
            }
        }
        rendered
    }

    fn render_text(entry: &LogEntry) -> String {
        entry
            .args
            .iter()
            .map(|a| a.to_text(true))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_first_min_repeats_render_individually() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        let entries = (0..5).map(|i| at(i * 10, "same")).collect();
        assert_eq!(run(&mut state, &config, entries).len(), 5);

        assert_eq!(state.observe(&at(60, "same"), &config), ThrottleDecision::Suppress);
    }

    #[test]
    fn test_single_absorbed_repeat_flushes_without_annotation() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        let mut entries: Vec<_> = (0..6).map(|i| at(i * 10, "same")).collect();
        entries.push(at(70, "different"));

        let rendered = run(&mut state, &config, entries);
        assert_eq!(
            rendered,
            vec!["same", "same", "same", "same", "same", "same", "different"]
        );
    }

    #[test]
    fn test_many_absorbed_repeats_are_annotated() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        let mut entries: Vec<_> = (0..9).map(|i| at(i * 10, "same")).collect();
        entries.push(at(100, "different"));

        let rendered = run(&mut state, &config, entries);
        assert_eq!(rendered.len(), 7);
        assert_eq!(rendered[5], "same (repeated 4 times)");
        assert_eq!(rendered[6], "different");
        assert_eq!(state.repeat_count(), 1);
    }

    #[test]
    fn test_outside_window_always_renders() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        let entries = (0..10).map(|i| at(i * 1000, "same")).collect();
        assert_eq!(run(&mut state, &config, entries).len(), 10);
    }

    #[test]
    fn test_timer_flush_procedure() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        let entries = (0..8).map(|i| at(i, "spin")).collect();
        assert_eq!(run(&mut state, &config, entries).len(), 5);
        assert!(state.has_pending(&config));

        let flushed = state.take_pending(&config).expect("pending repeats");
        assert_eq!(render_text(&flushed), "spin (repeated 3 times)");
        assert!(!state.has_pending(&config));
        assert!(state.take_pending(&config).is_none());
    }

    #[test]
    fn test_unfingerprintable_entries_never_suppressed() {
        let config = ThrottleConfig::default();
        let mut state = ThrottleState::new();
        for i in 0..10 {
            let entry = LogEntry::new("info", LogLevel::INFO, vec![LogValue::opaque("x")])
                .with_timestamp(at(i, "").timestamp);
            assert!(matches!(
                state.observe(&entry, &config),
                ThrottleDecision::Render { flush: None }
            ));
            state.commit(entry);
        }
    }

    #[test]
    fn test_kind_and_tag_are_part_of_fingerprint() {
        let config = ThrottleConfig {
            window: Duration::from_secs(1),
            min_repeats: 1,
        };
        let mut state = ThrottleState::new();
        let a = at(0, "msg");
        let b = at(1, "msg").with_tag("other");
        assert_eq!(run(&mut state, &config, vec![a, b]).len(), 2);
    }
}
