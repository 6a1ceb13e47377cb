//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily-rotated file rather than stderr, since the terminal is
//! owned by the UI while the demo runs. Levels come from `RUST_LOG`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "tagpick=info,warn";

/// File name prefix for rotated logs.
const LOG_FILE_PREFIX: &str = "tagpick.log";

/// Initialize the logging system.
///
/// Logs are written to `log_dir`, or to the platform local data directory
/// when `None`:
/// - Linux: `~/.local/share/tagpick/logs/`
/// - macOS: `~/Library/Application Support/tagpick/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\tagpick\logs\`
///
/// Useful filters:
/// - `RUST_LOG=tagpick=debug` - fetch, cache and selection transitions
/// - `RUST_LOG=tagpick=trace` - every keystroke, timer and dropped message
///
/// The returned guard flushes the background writer when dropped; keep it
/// alive until the program exits.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created, or
/// if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// let _guard = tagpick::logging::init(None).expect("Failed to initialize logging");
/// ```
pub fn init(log_dir: Option<PathBuf>) -> anyhow::Result<WorkerGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => get_log_directory()?,
    };
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) = tracing_appender::non_blocking(file_appender(&log_dir));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tagpick starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(guard)
}

fn file_appender(log_dir: &Path) -> RollingFileAppender {
    RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX)
}

/// Get the default log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("tagpick").join("logs"))
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("tagpick shutting down");
}
