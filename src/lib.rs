//! Stanza: register long-running processes as Upstart services.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stanza::prelude::*;
//!
//! # async fn demo() -> stanza::core::Result<()> {
//! let config = ServiceConfig::new("myd", "My Daemon", "does things");
//! let service = UpstartService::new(config)?;
//! service.install().await?;
//!
//! let (handle, listener) = shutdown_channel();
//! handle.forward_os_signals()?;
//! let mut hooks = Hooks::new(|| Ok(()), || Ok(()));
//! service.run(&mut hooks, listener).await?;
//! # Ok(())
//! # }
//! ```

pub use stanza_core as core;
pub use stanza_platform as platform;

/// Prelude module for common imports.
pub mod prelude {
    pub use stanza_core::{
        Hooks, Lifecycle, LogSink, Service, ServiceConfig, ServiceError, Severity, ShutdownHandle,
        ShutdownListener, Signal, shutdown_channel,
    };
    pub use stanza_platform::{InitSystem, SyslogSink, UpstartService, detect_init_system};
}
