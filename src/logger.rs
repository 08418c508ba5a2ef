use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: OnceLock<()> = OnceLock::new();
static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "DEVBOX_LOG";

/// Log to the devbox log file; with `verbose`, also log debug events to stderr.
pub fn init(verbose: bool) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    init_inner(verbose)?;
    let _ = INIT.set(());
    Ok(())
}

fn init_inner(verbose: bool) -> Result<()> {
    let log_path = determine_log_path()?;
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory at {}", parent.display()))?;
    }

    let (directory, file_name) = split_path(&log_path)?;
    let file_appender = rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(EnvFilter::new("debug"))
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_filter(env_filter),
        )
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

fn determine_log_path() -> Result<PathBuf> {
    let state_home = std::env::var("XDG_STATE_HOME").ok();
    if let Some(path) = log_path_from(state_home.as_deref(), home::home_dir().as_deref()) {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join("devbox.log"))
}

/// `$XDG_STATE_HOME/devbox/devbox.log`, else `~/.local/state/devbox/devbox.log`.
fn log_path_from(state_home: Option<&str>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(state_home) = state_home
        && !state_home.is_empty()
    {
        return Some(PathBuf::from(state_home).join("devbox").join("devbox.log"));
    }

    home.map(|home| {
        home.join(".local")
            .join("state")
            .join("devbox")
            .join("devbox.log")
    })
}

fn split_path(path: &Path) -> Result<(PathBuf, &str)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid log file name"))?;

    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok((dir, file_name))
}
