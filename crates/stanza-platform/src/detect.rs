//! Init system detection.
//!
//! Detection is by direct observation of the filesystem. systemd is checked
//! first: hosts migrated from Upstart often keep `/etc/init` and `initctl`
//! around after systemd has taken over PID 1.

use std::path::Path;

use stanza_core::{Result, ServiceError};

/// Init systems this crate can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitSystem {
    /// Upstart (`initctl`, job files in `/etc/init`).
    Upstart,
    /// systemd.
    Systemd,
    /// Anything else, including containers without an init daemon.
    Unknown,
}

impl InitSystem {
    /// Returns the init system name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Upstart => "upstart",
            Self::Systemd => "systemd",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detects the init system of the running host.
#[must_use]
pub fn detect_init_system() -> InitSystem {
    detect_init_system_at(Path::new("/"))
}

/// Detects the init system of the tree rooted at `root`.
#[must_use]
pub fn detect_init_system_at(root: &Path) -> InitSystem {
    if root.join("run/systemd/system").is_dir() {
        return InitSystem::Systemd;
    }

    if root.join("sbin/initctl").exists() && root.join("etc/init").is_dir() {
        return InitSystem::Upstart;
    }

    InitSystem::Unknown
}

/// Fails unless the running host is managed by Upstart.
///
/// # Errors
/// Returns [`ServiceError::NotSupported`] naming the detected init system.
pub fn require_upstart() -> Result<()> {
    match detect_init_system() {
        InitSystem::Upstart => Ok(()),
        other => Err(ServiceError::not_supported(format!(
            "upstart jobs cannot be managed on a {other} host"
        ))),
    }
}
