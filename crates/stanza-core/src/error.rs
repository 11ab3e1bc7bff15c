//! Error types for stanza-core.
//!
//! All errors are explicit and returned to the caller immediately. Nothing in
//! this workspace retries or recovers locally.

use std::path::PathBuf;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Error type for service registration and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Invalid service descriptor or configuration file.
    #[error("configuration error: {0}")]
    Config(String),

    /// A job file already exists at the target path.
    #[error("init job already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// No job file exists at the target path.
    #[error("init job not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A template field could not be rendered into a job stanza.
    #[error("render error: {0}")]
    Render(String),

    /// The system log is unavailable or rejected a message.
    #[error("log sink error: {0}")]
    LogSink(String),

    /// Shutdown channel or OS signal registration error.
    #[error("signal error: {0}")]
    Signal(String),

    /// Failure raised by a caller's start or stop callback.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The host does not run the required init system.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a render error.
    #[must_use]
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates a log sink error.
    #[must_use]
    pub fn log_sink(msg: impl Into<String>) -> Self {
        Self::LogSink(msg.into())
    }

    /// Creates a signal error.
    #[must_use]
    pub fn signal(msg: impl Into<String>) -> Self {
        Self::Signal(msg.into())
    }

    /// Creates a runtime error.
    #[must_use]
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    /// Returns true if this error reports an existing job file.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    /// Returns true if this error reports a missing job file.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
