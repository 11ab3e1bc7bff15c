//! Service abstraction and the run contract.
//!
//! A [`Service`] registers a process with the host init system and runs it in
//! the foreground. Running is orthogonal to registration: `run` may be called
//! whether or not `install` ever was.
//!
//! ```text
//! Not Installed ──install()──▶ Installed ──remove()──▶ Not Installed
//! ```

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::shutdown::ShutdownListener;
use crate::types::Severity;

/// Caller callbacks driven by [`Service::run`].
pub trait Lifecycle: Send {
    /// Starts the service's work. Must not block.
    ///
    /// # Errors
    /// An error aborts `run` before it waits for shutdown.
    fn on_start(&mut self) -> Result<()>;

    /// Stops the service's work after a shutdown request.
    ///
    /// # Errors
    /// The error is returned from `run` unchanged.
    fn on_stop(&mut self) -> Result<()>;
}

/// [`Lifecycle`] built from a pair of closures.
pub struct Hooks<S, T> {
    start: S,
    stop: T,
}

impl<S, T> Hooks<S, T>
where
    S: FnMut() -> Result<()> + Send,
    T: FnMut() -> Result<()> + Send,
{
    /// Wraps `start` and `stop` callbacks.
    pub const fn new(start: S, stop: T) -> Self {
        Self { start, stop }
    }
}

impl<S, T> Lifecycle for Hooks<S, T>
where
    S: FnMut() -> Result<()> + Send,
    T: FnMut() -> Result<()> + Send,
{
    fn on_start(&mut self) -> Result<()> {
        (self.start)()
    }

    fn on_stop(&mut self) -> Result<()> {
        (self.stop)()
    }
}

impl<S, T> fmt::Debug for Hooks<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// A process registered with an init system.
#[async_trait]
pub trait Service: Send + Sync {
    /// Returns the internal service name.
    fn name(&self) -> &str;

    /// Registers the service with the init system.
    ///
    /// # Errors
    /// Returns [`crate::ServiceError::AlreadyExists`] if it is already
    /// registered, or the I/O or render error that stopped registration.
    async fn install(&self) -> Result<()>;

    /// Unregisters the service.
    ///
    /// # Errors
    /// Returns [`crate::ServiceError::NotFound`] if it was not registered.
    async fn remove(&self) -> Result<()>;

    /// Runs `lifecycle` in the foreground until `shutdown` delivers a
    /// shutdown request.
    ///
    /// # Errors
    /// Returns the error of `on_start` (without calling `on_stop`) or of
    /// `on_stop`.
    async fn run(&self, lifecycle: &mut dyn Lifecycle, shutdown: ShutdownListener) -> Result<()>;

    /// Forwards a message to the system log.
    ///
    /// # Errors
    /// Returns an error if the log sink is unavailable.
    fn log(&self, severity: Severity, message: &str) -> Result<()>;

    /// Logs at error severity.
    fn log_error(&self, message: &str) -> Result<()> {
        self.log(Severity::Error, message)
    }

    /// Logs at warning severity.
    fn log_warning(&self, message: &str) -> Result<()> {
        self.log(Severity::Warning, message)
    }

    /// Logs at info severity.
    fn log_info(&self, message: &str) -> Result<()> {
        self.log(Severity::Info, message)
    }

    /// Logs preformatted arguments, e.g. `svc.log_fmt(Severity::Info, format_args!("pid {pid}"))`.
    fn log_fmt(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(message) => self.log(severity, message),
            None => self.log(severity, &args.to_string()),
        }
    }
}

/// Drives the run contract shared by every [`Service`] implementation.
///
/// Calls `on_start`, waits for a shutdown request (or for every handle to
/// be dropped), then calls `on_stop` exactly once.
///
/// # Errors
/// Returns the error of `on_start` or `on_stop` unchanged.
pub async fn run_until_shutdown(
    service: &str,
    lifecycle: &mut dyn Lifecycle,
    mut shutdown: ShutdownListener,
) -> Result<()> {
    lifecycle.on_start()?;
    tracing::info!(service = %service, "service started");

    match shutdown.wait().await {
        Some(sig) => tracing::info!(service = %service, signal = %sig, "shutdown requested"),
        None => tracing::warn!(service = %service, "shutdown channel closed"),
    }

    let result = lifecycle.on_stop();
    if let Err(ref e) = result {
        tracing::warn!(service = %service, error = %e, "stop callback failed");
    } else {
        tracing::info!(service = %service, "service stopped");
    }
    result
}
