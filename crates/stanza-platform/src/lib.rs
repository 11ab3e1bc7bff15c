// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # stanza-platform
//!
//! Upstart adapter for the stanza service framework.
//!
//! - [`UpstartService`] implements [`stanza_core::Service`] by writing and
//!   removing `/etc/init/<name>.conf`
//! - [`render_job`] produces the job stanza from a [`JobSpec`]
//! - [`SyslogSink`] forwards `log_*` messages to the local syslog daemon
//! - [`detect_init_system`] tells Upstart hosts from systemd ones
//!
//! ## Example
//!
//! ```rust,ignore
//! use stanza_core::{Service, ServiceConfig};
//! use stanza_platform::UpstartService;
//!
//! let service = UpstartService::new(ServiceConfig::new("myd", "My Daemon", "does things"))?;
//! service.install().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod detect;
pub mod exe;
pub mod job;
pub mod sink;
pub mod upstart;

pub use detect::{InitSystem, detect_init_system, detect_init_system_at, require_upstart};
pub use exe::current_exe_path;
pub use job::{JOB_TEMPLATE_VERSION, JobSpec, render_job};
pub use sink::SyslogSink;
pub use upstart::UpstartService;
