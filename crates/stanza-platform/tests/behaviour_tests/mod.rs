//! Shared fixtures for the behaviour tests.

mod lifecycle;
mod logging;
mod registration;

use std::path::Path;
use std::sync::Arc;

use stanza_core::{MemorySink, ServiceConfig};
use stanza_platform::UpstartService;

/// Adapter for `myd` rooted at `init_dir`, with a pinned executable.
pub fn myd_service(init_dir: &Path) -> UpstartService {
    let config = ServiceConfig::new("myd", "My Daemon", "does things")
        .with_init_dir(init_dir)
        .with_executable("/usr/local/bin/myd");
    UpstartService::with_sink(config, Arc::new(MemorySink::new())).unwrap()
}
