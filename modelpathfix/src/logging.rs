//! Console and per-run log file setup.
//!
//! Every event goes to two `fmt` layers: the console (info, or debug when
//! verbose, overridable with `RUST_LOG`) and a timestamped log file created
//! fresh for each run, which always records debug detail.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Extension of the per-run log file.
pub const LOG_FILE_EXTENSION: &str = "txt";

/// Errors that can occur while installing the logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The log file could not be opened.
    #[error("failed to open log file in {}: {source}", .path.display())]
    OpenFile { path: PathBuf, source: InitError },

    /// A global subscriber is already installed.
    #[error("failed to install logger: {0}")]
    Install(String),
}

/// Keeps the background log writer alive; flushes the file on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _worker: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    /// Path of this run's log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Log file stem for a run started at `now`, e.g. `2024-05-01_13-45-10_log`.
pub fn log_file_stem(now: DateTime<Local>) -> String {
    format!("{}_log", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Install the global subscriber, writing the log file into `directory`.
pub fn init_logging(directory: &Path, verbose: bool) -> Result<LogGuard, LoggingError> {
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let stem = log_file_stem(Local::now());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(LOG_FILE_EXTENSION)
        .build(directory)
        .map_err(|source| LoggingError::OpenFile {
            path: directory.to_path_buf(),
            source,
        })?;
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout)
        .with_filter(console_filter);

    let file = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_writer(writer)
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LogGuard {
        _worker: worker,
        path: directory.join(format!("{}.{}", stem, LOG_FILE_EXTENSION)),
    })
}
