//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and log the result as
//! a single string argument. Each expands to a `Result<()>`.
//!
//! # Examples
//!
//! ```
//! use rust_console_logger::prelude::*;
//! use rust_console_logger::{info, warn};
//!
//! let (stdout, buffer) = OutputStream::memory();
//! let (stderr, _) = OutputStream::memory();
//! let logger = Logger::builder()
//!     .renderer(BasicRenderer::new())
//!     .stdout(stdout)
//!     .stderr(stderr)
//!     .build();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! warn!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
//! assert_eq!(buffer.contents(), "[info] Server listening on port 8080\n");
//! ```

/// Log a formatted message as any configured kind.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::builder().renderer(BasicRenderer::new()).build();
/// use rust_console_logger::log_kind;
/// log_kind!(logger, "ready", "listening on {}", "0.0.0.0:80").unwrap();
/// assert!(log_kind!(logger, "no-such-kind", "dropped").is_err());
/// ```
#[macro_export]
macro_rules! log_kind {
    ($logger:expr, $kind:expr, $($arg:tt)+) => {
        $logger.log_kind($kind, [format!($($arg)+)])
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "trace", $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "debug", $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "info", $($arg)+)
    };
}

/// Log a success message (info severity).
#[macro_export]
macro_rules! success {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "success", $($arg)+)
    };
}

/// Log a start message (info severity).
#[macro_export]
macro_rules! start {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "start", $($arg)+)
    };
}

/// Log a ready message (info severity).
#[macro_export]
macro_rules! ready {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "ready", $($arg)+)
    };
}

/// Log a fail message (info severity).
#[macro_export]
macro_rules! fail {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "fail", $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "warn", $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::builder().renderer(BasicRenderer::new()).build();
/// use rust_console_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "error", $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_kind!($logger, "fatal", $($arg)+)
    };
}
