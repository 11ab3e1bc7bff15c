//! Self-executable resolution.

use std::path::PathBuf;

use stanza_core::Result;

/// Kernel link to the running process's executable.
pub const SELF_EXE_LINK: &str = "/proc/self/exe";

/// Returns the absolute path of the running executable.
///
/// Follows `/proc/self/exe`, so the result is the file the kernel actually
/// loaded, not whatever `argv[0]` claims.
///
/// # Errors
/// Returns an I/O error if the link cannot be read (e.g. no procfs).
pub async fn current_exe_path() -> Result<PathBuf> {
    Ok(tokio::fs::read_link(SELF_EXE_LINK).await?)
}
