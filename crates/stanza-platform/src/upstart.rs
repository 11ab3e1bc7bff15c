//! Upstart service adapter.
//!
//! # Overview
//!
//! - `install` writes `<init_dir>/<name>.conf` pointing at the running
//!   executable
//! - `remove` deletes that file
//! - `run` drives the caller's lifecycle until a shutdown request
//! - `log_*` forward to the system log
//!
//! Supervision (respawn, runlevels) is left entirely to Upstart via the
//! generated job file. Concurrent `install`/`remove` on the same service
//! are not coordinated; callers serialize them.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use stanza_core::{
    Lifecycle, LogSink, Result, Service, ServiceConfig, ServiceError, Severity, ShutdownListener,
    run_until_shutdown,
};
use tokio::io::AsyncWriteExt;

use crate::exe::current_exe_path;
use crate::job::{JobSpec, render_job};
use crate::sink::SyslogSink;

/// Service registered as an Upstart job.
pub struct UpstartService {
    config: ServiceConfig,
    sink: Arc<dyn LogSink>,
}

impl UpstartService {
    /// Creates an adapter that logs to the local syslog daemon.
    ///
    /// # Errors
    /// Returns an error if the config is invalid or syslog is unreachable.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let sink = SyslogSink::connect(config.name.clone())?;
        Ok(Self {
            config,
            sink: Arc::new(sink),
        })
    }

    /// Creates an adapter with a caller-provided log sink.
    ///
    /// # Errors
    /// Returns an error if the config is invalid.
    pub fn with_sink(config: ServiceConfig, sink: Arc<dyn LogSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    /// Returns the service descriptor.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the job file path.
    #[must_use]
    pub fn job_path(&self) -> PathBuf {
        self.config.job_path()
    }

    /// Returns true if a job file exists for this service.
    ///
    /// # Errors
    /// Returns an I/O error if existence cannot be determined.
    pub async fn is_installed(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.job_path()).await?)
    }

    /// Renders the job file this service would install, without writing it.
    ///
    /// # Errors
    /// Returns an error if the executable cannot be resolved or rendered.
    pub async fn render(&self) -> Result<String> {
        let exe = self.executable().await?;
        render_job(&JobSpec::from_config(&self.config, &exe))
    }

    async fn executable(&self) -> Result<PathBuf> {
        match self.config.executable {
            Some(ref exe) => Ok(exe.clone()),
            None => current_exe_path().await,
        }
    }
}

#[async_trait]
impl Service for UpstartService {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn install(&self) -> Result<()> {
        let path = self.job_path();
        if tokio::fs::try_exists(&path).await? {
            return Err(ServiceError::AlreadyExists(path));
        }

        let job = self.render().await?;

        // create_new closes the window between the check above and the write.
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ServiceError::AlreadyExists(path));
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(job.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "job write failed, removing partial file");
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove partial job file");
            }
            return Err(e.into());
        }

        tracing::info!(service = %self.config.name, path = %path.display(), "installed upstart job");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        let path = self.job_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(service = %self.config.name, path = %path.display(), "removed upstart job");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::NotFound(path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn run(&self, lifecycle: &mut dyn Lifecycle, shutdown: ShutdownListener) -> Result<()> {
        run_until_shutdown(&self.config.name, lifecycle, shutdown).await
    }

    fn log(&self, severity: Severity, message: &str) -> Result<()> {
        self.sink.write(severity, message)
    }
}

impl std::fmt::Debug for UpstartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstartService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
