//! System log sink.
//!
//! Messages go to the local syslog socket in RFC 3164 format, tagged with
//! the service name and the current process id.

use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use stanza_core::{LogSink, Result, ServiceError, Severity};
use syslog::{Facility, Formatter3164, Logger, LoggerBackend};

type SyslogLogger = Logger<LoggerBackend, Formatter3164>;

/// Log sink backed by the local syslog daemon.
///
/// One connection is shared by all callers; the mutex keeps each message a
/// single write on the socket. A failed write reconnects once and retries,
/// so a restarted syslog daemon is picked up again.
pub struct SyslogSink {
    tag: String,
    formatter: Formatter3164,
    /// `None` searches the platform's standard socket paths.
    socket: Option<PathBuf>,
    logger: Mutex<SyslogLogger>,
}

impl SyslogSink {
    /// Connects to the local syslog socket, tagging messages with `tag`.
    ///
    /// # Errors
    /// Returns [`ServiceError::LogSink`] if no syslog socket is reachable.
    pub fn connect(tag: impl Into<String>) -> Result<Self> {
        Self::open(tag.into(), None)
    }

    /// Connects to the syslog socket at `path`.
    ///
    /// # Errors
    /// Returns [`ServiceError::LogSink`] if the socket is not reachable.
    pub fn connect_at(tag: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(tag.into(), Some(path.into()))
    }

    fn open(tag: String, socket: Option<PathBuf>) -> Result<Self> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: tag.clone(),
            pid: std::process::id(),
        };
        let logger = dial(&formatter, socket.as_deref())?;

        tracing::debug!(tag = %tag, socket = ?socket, "connected to syslog");
        Ok(Self {
            tag,
            formatter,
            socket,
            logger: Mutex::new(logger),
        })
    }

    /// Returns the tag messages are sent with.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

fn dial(formatter: &Formatter3164, socket: Option<&Path>) -> Result<SyslogLogger> {
    let logger = match socket {
        Some(path) => syslog::unix_custom(formatter.clone(), path),
        None => syslog::unix(formatter.clone()),
    };
    logger.map_err(|e| ServiceError::log_sink(format!("failed to connect to syslog: {e}")))
}

fn send(logger: &mut SyslogLogger, severity: Severity, message: &str) -> syslog::Result<()> {
    match severity {
        Severity::Error => logger.err(message),
        Severity::Warning => logger.warning(message),
        Severity::Info => logger.info(message),
    }
}

impl LogSink for SyslogSink {
    fn write(&self, severity: Severity, message: &str) -> Result<()> {
        let mut logger = self.logger.lock();
        let Err(first) = send(&mut logger, severity, message) else {
            return Ok(());
        };

        tracing::debug!(tag = %self.tag, error = %first, "syslog write failed, reconnecting");
        *logger = dial(&self.formatter, self.socket.as_deref())?;
        send(&mut logger, severity, message)
            .map_err(|e| ServiceError::log_sink(format!("syslog write failed: {e}")))
    }
}

impl fmt::Debug for SyslogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogSink")
            .field("tag", &self.tag)
            .field("socket", &self.socket)
            .finish_non_exhaustive()
    }
}
