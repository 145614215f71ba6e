//! Logger metrics for observability
//!
//! Counters describing what the dispatch engine did with each call: how many
//! records were rendered, filtered by severity, absorbed as duplicates,
//! replayed from the pause queue, and how many renderer calls failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatch counters
///
/// # Example
///
/// ```
/// use rust_console_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_rendered();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.rendered_count(), 1);
/// assert_eq!(metrics.suppressed_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to the renderers
    rendered: AtomicU64,

    /// Records dropped by the severity threshold
    filtered: AtomicU64,

    /// Duplicates absorbed by the throttle
    suppressed: AtomicU64,

    /// Flushes of accumulated repeats
    repeat_flushes: AtomicU64,

    /// Calls deferred while logging was paused
    queued: AtomicU64,

    /// Renderer calls that returned an error
    render_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            rendered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            repeat_flushes: AtomicU64::new(0),
            queued: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn rendered_count(&self) -> u64 {
        self.rendered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn repeat_flush_count(&self) -> u64 {
        self.repeat_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queued_count(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn render_failure_count(&self) -> u64 {
        self.render_failures.load(Ordering::Relaxed)
    }

    /// Record a rendered entry, returning the previous count
    #[inline]
    pub fn record_rendered(&self) -> u64 {
        self.rendered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_repeat_flush(&self) -> u64 {
        self.repeat_flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queued(&self) -> u64 {
        self.queued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_render_failure(&self) -> u64 {
        self.render_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of dispatched records absorbed as duplicates (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn suppression_rate(&self) -> f64 {
        let suppressed = self.suppressed_count() as f64;
        let total = self.rendered_count() as f64 + suppressed;
        if total == 0.0 {
            0.0
        } else {
            (suppressed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.rendered.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.repeat_flushes.store(0, Ordering::Relaxed);
        self.queued.store(0, Ordering::Relaxed);
        self.render_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            rendered: AtomicU64::new(self.rendered_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            suppressed: AtomicU64::new(self.suppressed_count()),
            repeat_flushes: AtomicU64::new(self.repeat_flush_count()),
            queued: AtomicU64::new(self.queued_count()),
            render_failures: AtomicU64::new(self.render_failure_count()),
        }
    }
}
