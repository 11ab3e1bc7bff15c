//! Shutdown channel.
//!
//! A service waits on a [`ShutdownListener`]; anything holding a
//! [`ShutdownHandle`] can wake it. OS signals are just one producer,
//! attached explicitly with [`ShutdownHandle::forward_os_signals`], so
//! several services in one process never compete for a global registration.

use tokio::sync::mpsc;

use crate::error::{Result, ServiceError};
use crate::types::Signal;

/// Number of undelivered signals buffered per channel.
pub const SHUTDOWN_CHANNEL_CAPACITY: usize = 3;

/// Creates a connected handle/listener pair.
#[must_use]
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownListener) {
    let (tx, rx) = mpsc::channel(SHUTDOWN_CHANNEL_CAPACITY);
    (ShutdownHandle { tx }, ShutdownListener { rx })
}

/// Sending half of a shutdown channel.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<Signal>,
}

impl ShutdownHandle {
    /// Delivers a signal to the listener.
    ///
    /// # Errors
    /// Returns an error if the listener has been dropped.
    pub async fn request(&self, signal: Signal) -> Result<()> {
        self.tx
            .send(signal)
            .await
            .map_err(|_| ServiceError::signal("shutdown listener closed"))
    }

    /// Delivers a signal without waiting for buffer space.
    ///
    /// Usable from synchronous code and other threads.
    ///
    /// # Errors
    /// Returns an error if the listener has been dropped or the buffer is full.
    pub fn try_request(&self, signal: Signal) -> Result<()> {
        self.tx.try_send(signal).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ServiceError::signal("shutdown channel full"),
            mpsc::error::TrySendError::Closed(_) => {
                ServiceError::signal("shutdown listener closed")
            }
        })
    }

    /// Requests graceful termination.
    ///
    /// # Errors
    /// Returns an error if the listener has been dropped.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(Signal::Term).await
    }

    /// Returns true once the listener has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Forwards SIGINT and SIGTERM received by this process into the channel.
    ///
    /// Must be called from within a tokio runtime. The forwarding task ends
    /// when the listener is dropped.
    ///
    /// # Errors
    /// Returns an error if a signal handler cannot be registered.
    #[cfg(unix)]
    pub fn forward_os_signals(&self) -> Result<tokio::task::JoinHandle<()>> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt = signal(SignalKind::interrupt())
            .map_err(|e| ServiceError::signal(format!("failed to register SIGINT handler: {e}")))?;
        let mut terminate = signal(SignalKind::terminate())
            .map_err(|e| ServiceError::signal(format!("failed to register SIGTERM handler: {e}")))?;

        let tx = self.tx.clone();
        Ok(tokio::spawn(async move {
            loop {
                let sig = tokio::select! {
                    Some(()) = interrupt.recv() => Signal::Int,
                    Some(()) = terminate.recv() => Signal::Term,
                    else => break,
                };
                tracing::debug!(signal = %sig, "forwarding OS signal");
                if tx.send(sig).await.is_err() {
                    break;
                }
            }
        }))
    }
}

/// Receiving half of a shutdown channel.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: mpsc::Receiver<Signal>,
}

impl ShutdownListener {
    /// Receives the next signal, if one is already queued.
    pub fn try_recv(&mut self) -> Option<Signal> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next shutdown request.
    ///
    /// Returns `None` once every handle has been dropped.
    pub async fn wait(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }
}
