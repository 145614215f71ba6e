//! Core logger types and traits

pub mod config;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod log_types;
pub mod logger;
pub mod metrics;
pub mod mock;
pub mod output;
pub mod pause;
pub mod prompt;
pub mod renderer;
pub mod scheduler;
pub mod throttle;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_entry::{Additional, ErrorValue, LogCall, LogDefaults, LogEntry, LogValue, PartialLogEntry};
pub use log_level::{LevelInput, LogLevel};
pub use log_types::{LogType, LogTypes};
pub use logger::{CallSite, LogWriter, Logger, LoggerBuilder, LoggerOptions, OutputGuard};
pub use metrics::LoggerMetrics;
pub use mock::{MockCallSite, MockFn, MockRecorder};
pub use output::{MemoryBuffer, OutputStream};
pub use pause::{DeferredDispatch, PauseCoordinator};
pub use prompt::{
    CancelPolicy, LinePrompter, PromptKind, PromptOptions, PromptResponse, PromptValue, Prompter,
    ScriptedPrompter,
};
pub use renderer::{FormatOptions, RenderContext, Renderer};
pub use scheduler::FlushScheduler;
pub use throttle::{
    ThrottleConfig, ThrottleDecision, ThrottleState, DEFAULT_THROTTLE_MIN_REPEATS,
    DEFAULT_THROTTLE_WINDOW,
};
pub use timestamp::{Clock, ManualClock, SystemClock, TimestampFormat};
