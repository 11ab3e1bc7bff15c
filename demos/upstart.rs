//! Stanza demo: registers itself as an Upstart job and runs until signalled.
//!
//! # Usage
//!
//! ```bash
//! # Install /etc/init/stanza-demo.conf pointing at this binary (root)
//! sudo stanza-demo install
//!
//! # Print the job file without writing it
//! stanza-demo render
//!
//! # Run in the foreground until SIGINT/SIGTERM (what Upstart executes)
//! stanza-demo
//!
//! # Remove the job file again
//! sudo stanza-demo remove
//!
//! # Point at a scratch directory instead of /etc/init
//! stanza-demo install --init-dir /tmp/init
//! ```
//!
//! Set `RUST_LOG=debug` for diagnostic output on stderr.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, bail};
use stanza::prelude::*;
use stanza::core::DEFAULT_INIT_DIR;
use stanza::platform::require_upstart;
use tracing_subscriber::EnvFilter;

const NAME: &str = "stanza-demo";
const DISPLAY_NAME: &str = "Stanza Demo";
const DESCRIPTION: &str = "Counts ticks until told to stop";

enum Command {
    Install,
    Remove,
    Render,
    Run,
}

struct Args {
    command: Command,
    init_dir: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut command = Command::Run;
    let mut init_dir = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "install" => command = Command::Install,
            "remove" | "uninstall" => command = Command::Remove,
            "render" => command = Command::Render,
            "run" => command = Command::Run,
            "--init-dir" => {
                init_dir = Some(PathBuf::from(args.next().context("--init-dir needs a value")?));
            }
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a value")?));
            }
            "--help" | "-h" => {
                println!("Usage: {NAME} [install|remove|render|run] [--init-dir DIR] [--config FILE]");
                return Ok(None);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(Args {
        command,
        init_dir,
        config,
    }))
}

fn load_config(args: &Args) -> anyhow::Result<ServiceConfig> {
    let mut config = match args.config {
        Some(ref path) => ServiceConfig::load(path)?,
        None => ServiceConfig::new(NAME, DISPLAY_NAME, DESCRIPTION),
    };
    if let Some(ref dir) = args.init_dir {
        config = config.with_init_dir(dir);
    }
    Ok(config)
}

/// Only the real init directory needs a live Upstart; scratch directories do not.
fn needs_upstart(config: &ServiceConfig) -> bool {
    config.init_dir == Path::new(DEFAULT_INIT_DIR)
}

/// Counter whose start/stop callbacks are driven by the service.
struct Ticker {
    count: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl Ticker {
    fn start(&self) -> stanza::core::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        let count = Arc::clone(&self.count);
        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                let n = count.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(tick = n, "tick");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        Ok(())
    }

    fn stop(&self) -> stanza::core::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let config = load_config(&args)?;
    let check_upstart = needs_upstart(&config);

    match args.command {
        Command::Render => {
            let sink = Arc::new(stanza::core::MemorySink::new());
            let service = UpstartService::with_sink(config, sink)?;
            print!("{}", service.render().await?);
        }
        Command::Install => {
            if check_upstart {
                require_upstart()?;
            }
            let service = UpstartService::new(config)?;
            service.install().await?;
            println!("installed {}", service.job_path().display());
        }
        Command::Remove => {
            if check_upstart {
                require_upstart()?;
            }
            let service = UpstartService::new(config)?;
            service.remove().await?;
            println!("removed {}", service.job_path().display());
        }
        Command::Run => {
            let service = UpstartService::new(config)?;
            let (handle, listener) = shutdown_channel();
            handle.forward_os_signals()?;

            let ticker = Ticker {
                count: Arc::new(AtomicU64::new(0)),
                running: Arc::new(AtomicBool::new(false)),
            };
            let count = Arc::clone(&ticker.count);
            let ticker = Arc::new(ticker);
            let (start, stop) = (Arc::clone(&ticker), Arc::clone(&ticker));
            let mut hooks = Hooks::new(move || start.start(), move || stop.stop());

            service.log_info("starting")?;
            service.run(&mut hooks, listener).await?;
            service.log_fmt(
                Severity::Info,
                format_args!("stopped after {} ticks", count.load(Ordering::Relaxed)),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_init_dir_needs_upstart() {
        let config = ServiceConfig::new(NAME, DISPLAY_NAME, DESCRIPTION);
        assert!(needs_upstart(&config));
        assert!(!needs_upstart(&config.with_init_dir("/tmp/init")));
    }

    #[test]
    fn test_config_file_keeps_default_init_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("myd.toml");
        std::fs::write(&path, "name = \"myd\"\n").unwrap();

        let args = Args {
            command: Command::Install,
            init_dir: None,
            config: Some(path.clone()),
        };
        assert!(needs_upstart(&load_config(&args).unwrap()));

        std::fs::write(&path, "name = \"myd\"\ninit_dir = \"/tmp/init\"\n").unwrap();
        assert!(!needs_upstart(&load_config(&args).unwrap()));
    }
}
