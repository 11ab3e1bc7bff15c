// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # stanza-core
//!
//! Core primitives for registering a long-running process as an init-system
//! service:
//!
//! - [`ServiceConfig`] describes the service (name, display name, description)
//! - [`Service`] is the install/remove/run/log contract an adapter implements
//! - [`Lifecycle`] and [`Hooks`] carry the caller's start/stop callbacks
//! - [`shutdown_channel`] replaces global signal registration with an
//!   explicit handle/listener pair
//! - [`LogSink`] is where `log_*` messages end up
//!
//! ## Example
//!
//! ```rust,ignore
//! use stanza_core::{Hooks, Service, shutdown_channel};
//!
//! let (handle, listener) = shutdown_channel();
//! handle.forward_os_signals()?;
//!
//! let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
//! service.run(&mut hooks, listener).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod log;
pub mod service;
pub mod shutdown;
#[cfg(test)]
mod tests;
pub mod types;

pub use config::{DEFAULT_INIT_DIR, RespawnLimit, ServiceConfig, validate_name};
pub use error::{Result, ServiceError};
pub use log::{LogRecord, LogSink, MemorySink};
pub use service::{Hooks, Lifecycle, Service, run_until_shutdown};
pub use shutdown::{ShutdownHandle, ShutdownListener, shutdown_channel};
pub use types::{Severity, Signal};
