//! # Rust Console Logger
//!
//! A structured console logging facade: log calls are normalized into
//! records, filtered by severity, coalesced when the same record floods in,
//! and handed to pluggable renderers that write styled text to stdout or
//! stderr.
//!
//! ## Features
//!
//! - **Severity filtering**: open-ended integer scale, lower is more severe
//! - **Duplicate throttling**: repeated records collapse into one
//!   `(repeated N times)` line
//! - **Pause/resume**: dispatches queue while paused and replay in order
//! - **Renderers**: plain `[kind] [tag] message` lines or a decorated layout
//!   with icons, badges, colors and boxes
//! - **Text utilities**: ANSI colors, width-aware alignment, boxes, trees
//!
//! ```
//! use rust_console_logger::prelude::*;
//!
//! let (stdout, buffer) = OutputStream::memory();
//! let logger = Logger::builder()
//!     .renderer(BasicRenderer::new())
//!     .stdout(stdout)
//!     .tag("app")
//!     .build();
//!
//! logger.info(["listening on", "0.0.0.0:8080"]).unwrap();
//! logger.debug(["below the default threshold"]).unwrap();
//! assert_eq!(buffer.contents(), "[info] [app] listening on 0.0.0.0:8080\n");
//! ```

pub mod core;
pub mod macros;
pub mod renderers;
pub mod utils;

pub mod prelude {
    pub use crate::core::{
        CallSite, CancelPolicy, Clock, ErrorValue, FormatOptions, LevelInput, LogDefaults,
        LogEntry, LogLevel, LogType, LogTypes, LogValue, LogWriter, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, ManualClock, MemoryBuffer, OutputGuard,
        OutputStream, PartialLogEntry, PauseCoordinator, PromptOptions, PromptValue, Prompter,
        RenderContext, Renderer, Result, TimestampFormat,
    };
    pub use crate::renderers::{BasicRenderer, FancyRenderer};
    pub use crate::utils::{format_tree, render_box, BoxOptions, BoxStyle, TreeItem, TreeOptions};
}

pub use core::{
    CallSite, ErrorValue, FormatOptions, LogEntry, LogLevel, LogTypes, LogValue, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputStream, PartialLogEntry,
    PauseCoordinator, RenderContext, Renderer, Result,
};
pub use renderers::{BasicRenderer, FancyRenderer};
