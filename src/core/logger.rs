//! The logging facade
//!
//! A [`Logger`] resolves each call against its kind table, drops entries
//! below its threshold, defers while its [`PauseCoordinator`] is paused,
//! absorbs floods of identical entries, and hands the rest to every
//! registered [`Renderer`].
//!
//! `Logger` is a cheap handle: clones refer to the same instance. Child
//! loggers from [`Logger::create`], [`Logger::with_defaults`] and
//! [`Logger::with_tag`] are separate instances that share the parent's
//! renderer list, pause coordinator, prompter and clock.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_entry::{LogCall, LogDefaults, LogEntry, LogValue, PartialLogEntry},
    log_level::{LevelInput, LogLevel},
    log_types::{LogType, LogTypes},
    metrics::LoggerMetrics,
    mock::{MockCallSite, MockFn, MockTable},
    output::OutputStream,
    pause::{DeferredDispatch, PauseCoordinator},
    prompt::{PromptOptions, PromptResponse, PromptValue, Prompter},
    renderer::{FormatOptions, RenderContext, Renderer},
    scheduler::FlushScheduler,
    throttle::{ThrottleConfig, ThrottleDecision, ThrottleState},
    timestamp::{Clock, SystemClock, TimestampFormat},
};
use crate::renderers::FancyRenderer;
use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Settings every dispatch is resolved against
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerOptions {
    /// Entries with a numerically greater severity are dropped
    pub level: LogLevel,
    pub types: LogTypes,
    pub defaults: LogDefaults,
    pub throttle: ThrottleConfig,
    pub format: FormatOptions,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            types: LogTypes::default(),
            defaults: LogDefaults::default(),
            throttle: ThrottleConfig::default(),
            format: FormatOptions::default(),
        }
    }
}

impl LoggerOptions {
    /// Overlay the fields set in `config`
    pub fn apply(&mut self, config: &LoggerConfig) {
        if let Some(types) = &config.types {
            self.types = types.clone();
        }
        if let Some(level) = &config.level {
            self.level = self.types.normalize_level(Some(level), self.level);
        }
        if let Some(ms) = config.throttle_ms {
            self.throttle.window = Duration::from_millis(ms);
        }
        if let Some(min_repeats) = config.throttle_min_repeats {
            self.throttle.min_repeats = min_repeats;
        }
        if let Some(date) = config.date {
            self.format.date = date;
        }
        if let Some(colors) = config.colors {
            self.format.colors = colors;
        }
        if let Some(compact) = config.compact {
            self.format.compact = compact;
        }
        if let Some(columns) = config.columns {
            self.format.columns = Some(columns);
        }
        if let Some(format) = &config.timestamp_format {
            self.format.timestamp_format = format.clone();
        }
        if let Some(defaults) = &config.defaults {
            self.defaults = defaults.clone();
        }
    }
}

#[derive(Debug, Clone)]
struct Streams {
    stdout: OutputStream,
    stderr: OutputStream,
}

#[derive(Debug, Default)]
struct DispatchState {
    throttle: ThrottleState,
    /// Bumped on every dispatch; a deferred flush only runs if it still
    /// matches the generation it was scheduled with
    generation: u64,
}

type RendererList = Arc<RwLock<Vec<Arc<dyn Renderer>>>>;

struct Parts {
    options: LoggerOptions,
    streams: Streams,
    renderers: RendererList,
    pause: PauseCoordinator,
    mock: Option<MockFn>,
    prompter: Option<Arc<dyn Prompter>>,
    clock: Arc<dyn Clock>,
}

struct LoggerInner {
    options: RwLock<LoggerOptions>,
    streams: RwLock<Streams>,
    renderers: RendererList,
    state: Mutex<DispatchState>,
    scheduler: FlushScheduler,
    pause: PauseCoordinator,
    mock: RwLock<Option<MockTable>>,
    prompter: Option<Arc<dyn Prompter>>,
    metrics: LoggerMetrics,
    clock: Arc<dyn Clock>,
}

impl LoggerInner {
    fn call(self: &Arc<Self>, kind: &str, args: Vec<LogValue>, raw: bool) -> Result<()> {
        let kind = kind.to_lowercase();
        if let Some(site) = self.mock_site(&kind) {
            site(&args);
            return Ok(());
        }
        self.dispatch(kind, LogCall::classify(args, raw))
    }

    fn call_entry(self: &Arc<Self>, kind: &str, entry: PartialLogEntry) -> Result<()> {
        let kind = kind.to_lowercase();
        if let Some(site) = self.mock_site(&kind) {
            let mut args: Vec<LogValue> = entry.message.into_iter().collect();
            args.extend(entry.args.unwrap_or_default());
            site(&args);
            return Ok(());
        }
        self.dispatch(kind, LogCall::Entry(entry))
    }

    fn mock_site(&self, kind: &str) -> Option<MockCallSite> {
        self.mock.read().as_ref().and_then(|table| table.site(kind))
    }

    fn kind_type(&self, kind: &str) -> Result<LogType> {
        self.options
            .read()
            .types
            .get(kind)
            .cloned()
            .ok_or_else(|| LoggerError::unknown_kind(kind))
    }

    fn admits(&self, kind_type: &LogType) -> bool {
        let threshold = self.options.read().level;
        if kind_type.level.unwrap_or(LogLevel::INFO).passes(threshold) {
            true
        } else {
            self.metrics.record_filtered();
            false
        }
    }

    /// Filter, then either queue (paused) or emit now
    fn dispatch(self: &Arc<Self>, kind: String, call: LogCall) -> Result<()> {
        let kind_type = self.kind_type(&kind)?;
        if !self.admits(&kind_type) {
            return Ok(());
        }

        let this = Arc::clone(self);
        let deferred: DeferredDispatch = Box::new(move || this.emit(&kind, call));
        match self.pause.defer_or_return(deferred) {
            Some(run) => run(),
            None => {
                self.metrics.record_queued();
                Ok(())
            }
        }
    }

    /// Build the entry as of now and run it through the throttle
    fn emit(&self, kind: &str, call: LogCall) -> Result<()> {
        let entry = {
            let options = self.options.read();
            let kind_type = options
                .types
                .get(kind)
                .ok_or_else(|| LoggerError::unknown_kind(kind))?;
            if !kind_type.level.unwrap_or(LogLevel::INFO).passes(options.level) {
                self.metrics.record_filtered();
                return Ok(());
            }
            LogEntry::build(
                kind,
                kind_type,
                &options.defaults,
                &options.types,
                call,
                self.clock.now(),
            )
        };
        self.process(entry)
    }

    fn process(&self, entry: LogEntry) -> Result<()> {
        let throttle = self.options.read().throttle;
        let ctx = self.render_context();
        let renderers = self.renderers.read().clone();

        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        self.scheduler.cancel();

        match state.throttle.observe(&entry, &throttle) {
            ThrottleDecision::Suppress => {
                self.metrics.record_suppressed();
                self.scheduler.schedule(state.generation, throttle.window);
                Ok(())
            }
            ThrottleDecision::Render { flush } => {
                let flushed = match flush {
                    Some(pending) => {
                        self.metrics.record_repeat_flush();
                        self.render_all(&renderers, &pending, &ctx)
                    }
                    None => Ok(()),
                };
                let rendered = self.render_all(&renderers, &entry, &ctx);
                state.throttle.commit(entry);
                flushed.and(rendered)
            }
        }
    }

    /// Timer callback: flush pending repeats unless a newer dispatch
    /// superseded the schedule
    fn flush_deferred(&self, generation: u64) {
        let throttle = self.options.read().throttle;
        let ctx = self.render_context();
        let renderers = self.renderers.read().clone();

        let mut state = self.state.lock();
        if state.generation != generation {
            return;
        }
        if let Some(pending) = state.throttle.take_pending(&throttle) {
            self.metrics.record_repeat_flush();
            if let Err(e) = self.render_all(&renderers, &pending, &ctx) {
                eprintln!("[LOGGER ERROR] Failed to flush repeated log entries: {}", e);
            }
        }
    }

    /// Every renderer sees the entry; the first failure is returned
    fn render_all(
        &self,
        renderers: &[Arc<dyn Renderer>],
        entry: &LogEntry,
        ctx: &RenderContext,
    ) -> Result<()> {
        let mut first_error = None;
        for renderer in renderers {
            if let Err(e) = renderer.render(entry, ctx) {
                self.metrics.record_render_failure();
                first_error.get_or_insert_with(|| LoggerError::renderer(renderer.name(), e.to_string()));
            }
        }
        self.metrics.record_rendered();
        first_error.map_or(Ok(()), Err)
    }

    fn render_context(&self) -> RenderContext {
        let format = self.options.read().format.clone();
        let streams = self.streams.read();
        RenderContext::new(format, streams.stdout.clone(), streams.stderr.clone())
    }
}

impl Drop for LoggerInner {
    fn drop(&mut self) {
        let throttle = self.options.get_mut().throttle;
        let Some(pending) = self.state.get_mut().throttle.take_pending(&throttle) else {
            return;
        };
        let ctx = self.render_context();
        let renderers = self.renderers.read().clone();
        self.metrics.record_repeat_flush();
        if let Err(e) = self.render_all(&renderers, &pending, &ctx) {
            eprintln!("[LOGGER ERROR] Failed to flush repeated log entries on drop: {}", e);
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// A logger with the default kinds, level 3 and the fancy renderer on
    /// stdout/stderr
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_console_logger::prelude::*;
    ///
    /// let (stdout, buffer) = OutputStream::memory();
    /// let logger = Logger::builder()
    ///     .level(LogLevel::DEBUG)
    ///     .renderer(BasicRenderer::new())
    ///     .stdout(stdout)
    ///     .build();
    ///
    /// logger.debug(["cache warmed"]).unwrap();
    /// assert_eq!(buffer.contents(), "[debug] cache warmed\n");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn from_parts(parts: Parts) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<LoggerInner>| {
            let weak = weak.clone();
            let scheduler = FlushScheduler::new(Box::new(move |generation| {
                if let Some(inner) = weak.upgrade() {
                    inner.flush_deferred(generation);
                }
            }));
            let mock = parts
                .mock
                .map(|factory| MockTable::install(factory, &parts.options.types));

            LoggerInner {
                options: RwLock::new(parts.options),
                streams: RwLock::new(parts.streams),
                renderers: parts.renderers,
                state: Mutex::new(DispatchState::default()),
                scheduler,
                pause: parts.pause,
                mock: RwLock::new(mock),
                prompter: parts.prompter,
                metrics: LoggerMetrics::new(),
                clock: parts.clock,
            }
        });
        Self { inner }
    }

    /// Log `args` as `kind`.
    ///
    /// A single plain JSON object carrying `message` or `args` (and no
    /// `stack`) is merged as a partial record; see [`LogCall::classify`].
    pub fn log_kind<I, V>(&self, kind: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.inner
            .call(kind, args.into_iter().map(Into::into).collect(), false)
    }

    /// Log `args` as `kind` without record detection
    pub fn log_kind_raw<I, V>(&self, kind: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.inner
            .call(kind, args.into_iter().map(Into::into).collect(), true)
    }

    /// Log a partial record as `kind`
    pub fn log_entry(&self, kind: &str, entry: PartialLogEntry) -> Result<()> {
        self.inner.call_entry(kind, entry)
    }

    /// A reusable call-site bound to `kind`
    pub fn call_site(&self, kind: &str) -> Result<CallSite> {
        let kind = kind.to_lowercase();
        self.inner.kind_type(&kind)?;
        Ok(CallSite {
            logger: self.clone(),
            kind,
        })
    }

    pub fn level(&self) -> LogLevel {
        self.inner.options.read().level
    }

    /// Set the threshold from a number, level name or kind name; unknown
    /// names keep the current level
    pub fn set_level(&self, level: impl Into<LevelInput>) {
        let level = level.into();
        let mut options = self.inner.options.write();
        options.level = options.types.normalize_level(Some(&level), options.level);
    }

    /// Snapshot of the current options
    pub fn options(&self) -> LoggerOptions {
        self.inner.options.read().clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    fn derive(&self, options: LoggerOptions) -> Logger {
        Logger::from_parts(Parts {
            options,
            streams: self.inner.streams.read().clone(),
            renderers: Arc::clone(&self.inner.renderers),
            pause: self.inner.pause.clone(),
            mock: self.inner.mock.read().as_ref().map(MockTable::factory),
            prompter: self.inner.prompter.clone(),
            clock: Arc::clone(&self.inner.clock),
        })
    }

    /// A child logger with `overrides` applied on top of this one's options
    pub fn create(&self, overrides: LoggerConfig) -> Result<Logger> {
        overrides.validate()?;
        let mut options = self.options();
        options.apply(&overrides);
        Ok(self.derive(options))
    }

    /// A child logger whose defaults are overlaid with `defaults`
    pub fn with_defaults(&self, defaults: LogDefaults) -> Logger {
        let mut options = self.options();
        options.defaults = options.defaults.merged(&defaults);
        self.derive(options)
    }

    /// A child logger whose tag is appended to this one's with `:`
    ///
    /// ```
    /// use rust_console_logger::prelude::*;
    ///
    /// let (stdout, buffer) = OutputStream::memory();
    /// let logger = Logger::builder().renderer(BasicRenderer::new()).stdout(stdout).build();
    /// logger.with_tag("api").with_tag("v2").info(["up"]).unwrap();
    /// assert_eq!(buffer.contents(), "[info] [api:v2] up\n");
    /// ```
    pub fn with_tag(&self, tag: &str) -> Logger {
        let tag = match self.inner.options.read().defaults.tag.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{}:{}", parent, tag),
            _ => tag.to_string(),
        };
        self.with_defaults(LogDefaults {
            tag: Some(tag),
            ..LogDefaults::default()
        })
    }

    /// Register a renderer; shared with every child logger
    pub fn add_renderer<R: Renderer + 'static>(&self, renderer: R) {
        self.add_shared_renderer(Arc::new(renderer));
    }

    pub fn add_shared_renderer(&self, renderer: Arc<dyn Renderer>) {
        self.inner.renderers.write().push(renderer);
    }

    /// Remove every renderer named `name`; returns whether any was removed
    pub fn remove_renderer(&self, name: &str) -> bool {
        let mut renderers = self.inner.renderers.write();
        let before = renderers.len();
        renderers.retain(|r| r.name() != name);
        renderers.len() != before
    }

    pub fn clear_renderers(&self) {
        self.inner.renderers.write().clear();
    }

    pub fn set_renderers(&self, renderers: Vec<Arc<dyn Renderer>>) {
        *self.inner.renderers.write() = renderers;
    }

    pub fn renderer_names(&self) -> Vec<String> {
        self.inner
            .renderers
            .read()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    /// Queue every dispatch of every logger sharing this coordinator
    pub fn pause_logs(&self) {
        self.inner.pause.pause();
    }

    /// Unpause and replay queued dispatches in order before returning
    pub fn resume_logs(&self) -> Result<()> {
        self.inner.pause.resume()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.pause.is_paused()
    }

    pub fn pause_coordinator(&self) -> PauseCoordinator {
        self.inner.pause.clone()
    }

    /// Replace call-sites with the ones `factory` returns for each kind
    pub fn mock_types(&self, factory: MockFn) {
        let table = MockTable::install(factory, &self.inner.options.read().types);
        *self.inner.mock.write() = Some(table);
    }

    pub fn clear_mock(&self) {
        *self.inner.mock.write() = None;
    }

    /// Ask the configured prompter, applying the cancel policy on cancel
    pub fn prompt(&self, message: &str, options: &PromptOptions) -> Result<PromptValue> {
        let prompter = self
            .inner
            .prompter
            .as_ref()
            .ok_or(LoggerError::PromptUnavailable)?;
        match prompter.prompt(message, options)? {
            PromptResponse::Answered(value) => Ok(value),
            PromptResponse::Cancelled => options.resolve_cancel(),
        }
    }

    /// Write to `stdout`/`stderr` until the returned guard is dropped
    pub fn redirect_output(&self, stdout: OutputStream, stderr: OutputStream) -> OutputGuard {
        let previous = std::mem::replace(
            &mut *self.inner.streams.write(),
            Streams { stdout, stderr },
        );
        OutputGuard {
            logger: self.clone(),
            previous: Some(previous),
        }
    }

    /// An `io::Write` sink logging each written line as `kind`
    pub fn stream_writer(&self, kind: &str) -> Result<LogWriter> {
        let site = self.call_site(kind)?;
        Ok(LogWriter {
            site,
            pending: Vec::new(),
        })
    }
}

macro_rules! kind_methods {
    ($($(#[$doc:meta])* $name:ident => $kind:literal),* $(,)?) => {
        impl Logger {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $name<I, V>(&self, args: I) -> Result<()>
                where
                    I: IntoIterator<Item = V>,
                    V: Into<LogValue>,
                {
                    self.log_kind($kind, args)
                }
            )*
        }
    };
}

kind_methods! {
    fatal => "fatal",
    error => "error",
    warn => "warn",
    log => "log",
    info => "info",
    success => "success",
    fail => "fail",
    ready => "ready",
    start => "start",
    /// Draw the message in a bordered box (fancy) or a quoted block (basic)
    log_box => "box",
    debug => "debug",
    trace => "trace",
    verbose => "verbose",
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("renderers", &self.renderer_names())
            .field("paused", &self.is_paused())
            .finish()
    }
}

/// A logger bound to one kind
#[derive(Clone, Debug)]
pub struct CallSite {
    logger: Logger,
    kind: String,
}

impl CallSite {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn log<I, V>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.logger.log_kind(&self.kind, args)
    }

    pub fn raw<I, V>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        self.logger.log_kind_raw(&self.kind, args)
    }

    pub fn entry(&self, entry: PartialLogEntry) -> Result<()> {
        self.logger.log_entry(&self.kind, entry)
    }
}

/// Restores a logger's previous output streams when dropped
#[must_use = "output is restored as soon as the guard is dropped"]
pub struct OutputGuard {
    logger: Logger,
    previous: Option<Streams>,
}

impl OutputGuard {
    /// Restore the previous streams now
    pub fn restore(self) {}
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.logger.inner.streams.write() = previous;
        }
    }
}

impl std::fmt::Debug for OutputGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputGuard")
            .field("active", &self.previous.is_some())
            .finish()
    }
}

/// Line-buffered writer logging each complete line, trimmed, through the
/// raw call-site of its kind. Blank lines are skipped; a trailing partial
/// line is logged on flush or drop.
#[derive(Debug)]
pub struct LogWriter {
    site: CallSite,
    pending: Vec<u8>,
}

impl LogWriter {
    fn emit(&self, bytes: &[u8]) -> io::Result<()> {
        let line = String::from_utf8_lossy(bytes);
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        self.site.raw([line]).map_err(io::Error::other)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.emit(&line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.pending);
        self.emit(&line)
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to log buffered output: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_console_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .level("debug")
///     .tag("worker")
///     .throttle(Duration::from_millis(500))
///     .throttle_min_repeats(3)
///     .colors(true)
///     .renderer(FancyRenderer::new())
///     .build();
/// assert_eq!(logger.level(), LogLevel::DEBUG);
/// ```
pub struct LoggerBuilder {
    level: Option<LevelInput>,
    options: LoggerOptions,
    stdout: Option<OutputStream>,
    stderr: Option<OutputStream>,
    renderers: Vec<Arc<dyn Renderer>>,
    default_renderer: bool,
    pause: Option<PauseCoordinator>,
    prompter: Option<Arc<dyn Prompter>>,
    mock: Option<MockFn>,
    clock: Option<Arc<dyn Clock>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: None,
            options: LoggerOptions::default(),
            stdout: None,
            stderr: None,
            renderers: Vec::new(),
            default_renderer: true,
            pause: None,
            prompter: None,
            mock: None,
            clock: None,
        }
    }

    /// Threshold as a number, level name or kind name
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Replace the kind table
    #[must_use = "builder methods return a new value"]
    pub fn types(mut self, types: LogTypes) -> Self {
        self.options.types = types;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn defaults(mut self, defaults: LogDefaults) -> Self {
        self.options.defaults = defaults;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.options.defaults.tag = Some(tag.into());
        self
    }

    /// Throttle window
    #[must_use = "builder methods return a new value"]
    pub fn throttle(mut self, window: Duration) -> Self {
        self.options.throttle.window = window;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn throttle_min_repeats(mut self, min_repeats: u32) -> Self {
        self.options.throttle.min_repeats = min_repeats;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_options(mut self, format: FormatOptions) -> Self {
        self.options.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn date(mut self, date: bool) -> Self {
        self.options.format.date = date;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.options.format.colors = colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn compact(mut self, compact: bool) -> Self {
        self.options.format.compact = compact;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn columns(mut self, columns: usize) -> Self {
        self.options.format.columns = Some(columns);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.options.format.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stdout(mut self, stream: OutputStream) -> Self {
        self.stdout = Some(stream);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stderr(mut self, stream: OutputStream) -> Self {
        self.stderr = Some(stream);
        self
    }

    /// Add a renderer
    #[must_use = "builder methods return a new value"]
    pub fn renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderers.push(Arc::new(renderer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Whether to install the fancy renderer when no renderer was added
    #[must_use = "builder methods return a new value"]
    pub fn default_renderer(mut self, enabled: bool) -> Self {
        self.default_renderer = enabled;
        self
    }

    /// Share pausing with other loggers; defaults to the process-wide
    /// coordinator
    #[must_use = "builder methods return a new value"]
    pub fn pause_coordinator(mut self, pause: PauseCoordinator) -> Self {
        self.pause = Some(pause);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prompter<P: Prompter + 'static>(mut self, prompter: P) -> Self {
        self.prompter = Some(Arc::new(prompter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mock(mut self, factory: MockFn) -> Self {
        self.mock = Some(factory);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Apply a loaded configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &LoggerConfig) -> Self {
        let level = config.level.clone();
        let config = LoggerConfig {
            level: None,
            ..config.clone()
        };
        self.options.apply(&config);
        if level.is_some() {
            self.level = level;
        }
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut options = self.options;
        options.level = options
            .types
            .normalize_level(self.level.as_ref(), LogLevel::INFO);

        let mut renderers = self.renderers;
        if renderers.is_empty() && self.default_renderer {
            renderers.push(Arc::new(FancyRenderer::new()));
        }

        Logger::from_parts(Parts {
            options,
            streams: Streams {
                stdout: self.stdout.unwrap_or_else(OutputStream::stdout),
                stderr: self.stderr.unwrap_or_else(OutputStream::stderr),
            },
            renderers: Arc::new(RwLock::new(renderers)),
            pause: self.pause.unwrap_or_else(PauseCoordinator::global),
            mock: self.mock,
            prompter: self.prompter,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::MockRecorder;
    use crate::core::output::MemoryBuffer;
    use crate::core::prompt::{CancelPolicy, ScriptedPrompter};
    use crate::renderers::BasicRenderer;
    use serde_json::json;

    struct Harness {
        logger: Logger,
        out: MemoryBuffer,
        err: MemoryBuffer,
    }

    fn harness(builder: LoggerBuilder) -> Harness {
        let (stdout, out) = OutputStream::memory();
        let (stderr, err) = OutputStream::memory();
        let logger = builder
            .renderer(BasicRenderer::new())
            .stdout(stdout)
            .stderr(stderr)
            .pause_coordinator(PauseCoordinator::new())
            .build();
        Harness { logger, out, err }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _entry: &LogEntry, _ctx: &RenderContext) -> Result<()> {
            Err(LoggerError::other("sink closed"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().default_renderer(false).build();
        assert_eq!(logger.level(), LogLevel::INFO);
        assert!(logger.renderer_names().is_empty());

        let options = logger.options();
        assert_eq!(options.throttle, ThrottleConfig::default());
        assert!(options.format.date);
        assert!(!options.format.colors);
        assert!(options.format.compact);

        let fancy = Logger::builder().build();
        assert_eq!(fancy.renderer_names(), vec!["fancy"]);
    }

    #[test]
    fn test_routes_by_severity() {
        let h = harness(Logger::builder());
        h.logger.info(["hello"]).unwrap();
        h.logger.warn(["careful"]).unwrap();
        assert_eq!(h.out.contents(), "[info] hello\n");
        assert_eq!(h.err.contents(), "[warn] careful\n");
        assert_eq!(h.logger.metrics().rendered_count(), 2);
    }

    #[test]
    fn test_filter_by_level() {
        let h = harness(Logger::builder().level(LogLevel::WARN));
        h.logger.info(["dropped"]).unwrap();
        h.logger.debug(["dropped"]).unwrap();
        h.logger.error(["kept"]).unwrap();
        assert!(h.out.is_empty());
        assert_eq!(h.err.lines(), vec!["[error] kept"]);
        assert_eq!(h.logger.metrics().filtered_count(), 2);
    }

    #[test]
    fn test_set_level_by_name_and_number() {
        let h = harness(Logger::builder());
        h.logger.set_level("debug");
        assert_eq!(h.logger.level(), LogLevel::DEBUG);
        h.logger.set_level(1);
        assert_eq!(h.logger.level(), LogLevel::WARN);
        h.logger.set_level("not-a-kind");
        assert_eq!(h.logger.level(), LogLevel::WARN);
        h.logger.set_level("DEBUG");
        assert_eq!(h.logger.level(), LogLevel::DEBUG);
        h.logger.set_level(LogLevel::Verbose);
        h.logger.verbose(["everything"]).unwrap();
        assert_eq!(h.out.lines(), vec!["[verbose] everything"]);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let h = harness(Logger::builder());
        let err = h.logger.log_kind("nope", ["x"]).unwrap_err();
        assert!(matches!(err, LoggerError::UnknownKind { ref kind } if kind == "nope"));
        assert!(h.logger.call_site("nope").is_err());
        assert!(h.logger.stream_writer("nope").is_err());
    }

    #[test]
    fn test_kind_names_are_case_insensitive() {
        let h = harness(Logger::builder());
        h.logger.log_kind("INFO", ["loud"]).unwrap();
        assert_eq!(h.out.lines(), vec!["[info] loud"]);
    }

    #[test]
    fn test_structured_call_merges_record() {
        let h = harness(Logger::builder());
        h.logger
            .info([json!({"message": "deployed", "tag": "ci", "additional": ["v1.2"]})])
            .unwrap();
        assert_eq!(h.out.contents(), "[info] [ci] deployed \nv1.2\n");
    }

    #[test]
    fn test_raw_call_keeps_object() {
        let h = harness(Logger::builder());
        h.logger.log_kind_raw("info", [json!({"message": "m"})]).unwrap();
        assert_eq!(h.out.lines(), vec![r#"[info] {"message":"m"}"#]);
    }

    #[test]
    fn test_log_entry_and_call_site() {
        let h = harness(Logger::builder());
        h.logger
            .log_entry("success", PartialLogEntry::new().message("built").tag("cargo"))
            .unwrap();
        let site = h.logger.call_site("Start").unwrap();
        assert_eq!(site.kind(), "start");
        site.log(["go"]).unwrap();
        site.raw(["raw go"]).unwrap();
        assert_eq!(
            h.out.lines(),
            vec!["[success] [cargo] built", "[start] go", "[start] raw go"]
        );
    }

    #[test]
    fn test_child_loggers_share_renderers() {
        let h = harness(Logger::builder().tag("app"));
        let child = h.logger.with_tag("db");
        child.info(["connected"]).unwrap();
        assert_eq!(h.out.lines(), vec!["[info] [app:db] connected"]);

        h.logger.clear_renderers();
        child.info(["silent"]).unwrap();
        assert_eq!(h.out.lines().len(), 1);
        assert!(child.pause_coordinator().same_as(&h.logger.pause_coordinator()));
    }

    #[test]
    fn test_create_with_overrides() {
        let h = harness(Logger::builder());
        let child = h
            .logger
            .create(LoggerConfig::default().level("debug"))
            .unwrap();
        child.debug(["visible"]).unwrap();
        h.logger.debug(["hidden"]).unwrap();
        assert_eq!(h.out.lines(), vec!["[debug] visible"]);

        let bad = LoggerConfig {
            columns: Some(0),
            ..LoggerConfig::default()
        };
        assert!(h.logger.create(bad).is_err());
    }

    #[test]
    fn test_remove_and_set_renderers() {
        let h = harness(Logger::builder());
        assert!(h.logger.remove_renderer("basic"));
        assert!(!h.logger.remove_renderer("basic"));
        h.logger.info(["nobody listens"]).unwrap();
        assert!(h.out.is_empty());

        h.logger.set_renderers(vec![Arc::new(BasicRenderer::new())]);
        h.logger.info(["back"]).unwrap();
        assert_eq!(h.out.lines(), vec!["[info] back"]);
    }

    #[test]
    fn test_renderer_failure_propagates_after_all_renderers() {
        let h = harness(Logger::builder());
        h.logger.set_renderers(vec![
            Arc::new(FailingRenderer),
            Arc::new(BasicRenderer::new()),
        ]);
        let err = h.logger.info(["still written"]).unwrap_err();
        assert!(matches!(err, LoggerError::RendererError { ref renderer, .. } if renderer == "failing"));
        assert_eq!(h.out.lines(), vec!["[info] still written"]);
        assert_eq!(h.logger.metrics().render_failure_count(), 1);
    }

    #[test]
    fn test_pause_and_resume() {
        let h = harness(Logger::builder());
        h.logger.pause_logs();
        assert!(h.logger.is_paused());
        h.logger.info(["one"]).unwrap();
        h.logger.info(["two"]).unwrap();
        h.logger.debug(["filtered before queueing"]).unwrap();
        assert!(h.out.is_empty());
        assert_eq!(h.logger.metrics().queued_count(), 2);

        h.logger.resume_logs().unwrap();
        assert_eq!(h.out.lines(), vec!["[info] one", "[info] two"]);
    }

    #[test]
    fn test_mock_types() {
        let h = harness(Logger::builder());
        let recorder = MockRecorder::new();
        h.logger.mock_types(recorder.mock_fn());
        h.logger.warn(["mocked"]).unwrap();
        h.logger.log_entry("info", PartialLogEntry::new().message("m")).unwrap();
        assert!(h.err.is_empty() && h.out.is_empty());
        assert_eq!(recorder.calls().len(), 2);
        assert_eq!(recorder.calls()[0].0, "warn");

        h.logger.clear_mock();
        h.logger.warn(["real"]).unwrap();
        assert_eq!(h.err.lines(), vec!["[warn] real"]);
    }

    #[test]
    fn test_prompt() {
        let h = harness(Logger::builder());
        assert!(matches!(
            h.logger.prompt("name?", &PromptOptions::text()),
            Err(LoggerError::PromptUnavailable)
        ));

        let prompted = harness(Logger::builder().prompter(ScriptedPrompter::new([
            PromptResponse::Answered(PromptValue::Text("ferris".to_string())),
        ])));
        assert_eq!(
            prompted.logger.prompt("name?", &PromptOptions::text()).unwrap(),
            PromptValue::Text("ferris".to_string())
        );
        assert_eq!(
            prompted
                .logger
                .prompt("again?", &PromptOptions::confirm().cancel(CancelPolicy::Null))
                .unwrap(),
            PromptValue::Null
        );
        assert!(matches!(
            prompted
                .logger
                .prompt("last?", &PromptOptions::text().cancel(CancelPolicy::Reject)),
            Err(LoggerError::PromptCancelled)
        ));
    }

    #[test]
    fn test_redirect_output_restores_on_drop() {
        let h = harness(Logger::builder());
        let (stdout, redirected) = OutputStream::memory();
        let (stderr, _) = OutputStream::memory();
        {
            let _guard = h.logger.redirect_output(stdout, stderr);
            h.logger.info(["captured"]).unwrap();
        }
        h.logger.info(["restored"]).unwrap();
        assert_eq!(redirected.lines(), vec!["[info] captured"]);
        assert_eq!(h.out.lines(), vec!["[info] restored"]);
    }

    #[test]
    fn test_stream_writer_logs_lines() {
        let h = harness(Logger::builder());
        {
            let mut writer = h.logger.stream_writer("log").unwrap();
            write!(writer, "first line\n  second").unwrap();
            writer.write_all(b" half\n\n").unwrap();
            writer.write_all(b"tail").unwrap();
        }
        assert_eq!(
            h.out.lines(),
            vec!["[log] first line", "[log] second half", "[log] tail"]
        );
    }

    #[test]
    fn test_drop_flushes_pending_repeats() {
        let h = harness(Logger::builder().throttle_min_repeats(1).throttle(Duration::from_secs(60)));
        for _ in 0..4 {
            h.logger.info(["again"]).unwrap();
        }
        assert_eq!(h.out.lines().len(), 1);
        drop(h.logger);
        assert_eq!(h.out.lines(), vec!["[info] again", "[info] again (repeated 3 times)"]);
    }
}
