//! Error types for the console logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A log kind that is not present in the configured kind table
    #[error("Unsupported log kind: '{kind}'")]
    UnknownKind { kind: String },

    /// Prompting requested without a prompt collaborator
    #[error("Prompt is not supported: no prompter configured")]
    PromptUnavailable,

    /// Prompt cancelled under the `Reject` cancel policy
    #[error("Prompt cancelled")]
    PromptCancelled,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Renderer failure with renderer name
    #[error("Renderer '{renderer}' failed: {message}")]
    RendererError { renderer: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        LoggerError::UnknownKind { kind: kind.into() }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a renderer error
    pub fn renderer(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::RendererError {
            renderer: renderer.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error is a programmer/configuration error rather than
    /// a runtime output failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::UnknownKind { .. }
                | LoggerError::PromptUnavailable
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}
