//! Core types shared by the service adapter and its callers.

use serde::{Deserialize, Serialize};

/// Shutdown requests that can be delivered through a shutdown channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Interrupt (SIGINT).
    Int,
    /// Terminate (SIGTERM).
    Term,
    /// Kill.
    ///
    /// SIGKILL cannot be caught by a process; this variant is only ever
    /// delivered programmatically through a [`crate::ShutdownHandle`].
    Kill,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "SIGINT",
            Self::Term => "SIGTERM",
            Self::Kill => "SIGKILL",
        };
        f.write_str(name)
    }
}

/// Severity of a message forwarded to the system log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error condition.
    Error,
    /// Warning condition.
    Warning,
    /// Informational message.
    Info,
}

impl Severity {
    /// Returns the severity name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
