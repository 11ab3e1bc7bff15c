//! Service descriptor and configuration.
//!
//! A [`ServiceConfig`] is validated before any filesystem path is derived
//! from it, so a crafted name can never point outside the init directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ServiceError};

/// Directory Upstart reads job files from.
pub const DEFAULT_INIT_DIR: &str = "/etc/init";

/// Extension Upstart expects on job files.
pub const JOB_FILE_EXTENSION: &str = "conf";

/// Service descriptor.
///
/// The three naming attributes mirror what the init daemon shows to an
/// operator: `name` becomes the job name (`initctl start <name>`),
/// `display_name` the `description` directive and `description` the leading
/// comment of the job file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Internal service name (job name, syslog tag).
    pub name: String,

    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,

    /// Longer description.
    #[serde(default)]
    pub description: String,

    /// Directory the job file is written to.
    #[serde(default = "default_init_dir")]
    pub init_dir: PathBuf,

    /// Executable the job starts. Resolved from the running process when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Respawn rate limit.
    #[serde(default)]
    pub respawn: RespawnLimit,
}

fn default_init_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INIT_DIR)
}

impl ServiceConfig {
    /// Creates a service descriptor from caller-supplied names.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            init_dir: default_init_dir(),
            executable: None,
            respawn: RespawnLimit::default(),
        }
    }

    /// Overrides the init directory.
    #[must_use]
    pub fn with_init_dir(mut self, init_dir: impl Into<PathBuf>) -> Self {
        self.init_dir = init_dir.into();
        self
    }

    /// Pins the executable instead of resolving `/proc/self/exe`.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    /// Overrides the respawn limit.
    #[must_use]
    pub const fn with_respawn(mut self, respawn: RespawnLimit) -> Self {
        self.respawn = respawn;
        self
    }

    /// Returns the job file path, `<init_dir>/<name>.conf`.
    ///
    /// Only meaningful for a validated config.
    #[must_use]
    pub fn job_path(&self) -> PathBuf {
        self.init_dir
            .join(format!("{}.{}", self.name, JOB_FILE_EXTENSION))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_single_line("display_name", &self.display_name)?;
        validate_single_line("description", &self.description)?;

        if let Some(ref exe) = self.executable
            && !exe.is_absolute()
        {
            return Err(ServiceError::config(format!(
                "executable must be an absolute path: {}",
                exe.display()
            )));
        }

        self.respawn.validate()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServiceError::config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ServiceError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Validates a service name for use as a job file stem.
///
/// # Errors
/// Returns an error if the name is empty or contains anything other than
/// ASCII alphanumerics, hyphens and underscores.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ServiceError::config("name cannot be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ServiceError::config(format!(
            "name must contain only alphanumeric characters, hyphens, and underscores: {name:?}"
        )));
    }
    Ok(())
}

fn validate_single_line(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(ServiceError::config(format!(
            "{field} must not contain line breaks"
        )));
    }
    Ok(())
}

/// Upstart respawn rate limit: give up after `count` respawns within `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespawnLimit {
    /// Maximum respawns inside the interval.
    #[serde(default = "default_respawn_count")]
    pub count: u32,

    /// Window the count applies to.
    #[serde(default = "default_respawn_interval")]
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

fn default_respawn_count() -> u32 {
    10
}

fn default_respawn_interval() -> Duration {
    Duration::from_secs(5)
}

impl Default for RespawnLimit {
    fn default() -> Self {
        Self {
            count: default_respawn_count(),
            interval: default_respawn_interval(),
        }
    }
}

impl RespawnLimit {
    /// Validates the limit.
    ///
    /// # Errors
    /// Returns an error if either bound is zero, or if the interval is not a
    /// whole number of seconds (Upstart only takes seconds).
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(ServiceError::config("respawn count must be greater than 0"));
        }
        if self.interval.as_secs() == 0 {
            return Err(ServiceError::config(
                "respawn interval must be at least one second",
            ));
        }
        if self.interval.subsec_nanos() != 0 {
            return Err(ServiceError::config(format!(
                "respawn interval must be whole seconds: {}",
                humantime::format_duration(self.interval)
            )));
        }
        Ok(())
    }
}

/// Serde helper for humantime durations.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
