//! Log sinks for messages a service forwards to the system log.

use parking_lot::Mutex;

use crate::error::Result;
use crate::types::Severity;

/// Destination for service log messages.
///
/// Implementations must be safe to call from several threads at once and
/// must never interleave two messages.
pub trait LogSink: Send + Sync {
    /// Writes one message at the given severity.
    ///
    /// # Errors
    /// Returns an error if the underlying sink is unavailable.
    fn write(&self, severity: Severity, message: &str) -> Result<()>;
}

/// A single captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity the message was logged at.
    pub severity: Severity,
    /// Message text.
    pub message: String,
}

/// In-memory sink that keeps every record.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the records written so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn write(&self, severity: Severity, message: &str) -> Result<()> {
        self.records.lock().push(LogRecord {
            severity,
            message: message.to_string(),
        });
        Ok(())
    }
}
