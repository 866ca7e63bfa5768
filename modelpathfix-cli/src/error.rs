//! CLI error type.

use thiserror::Error;

use modelpathfix::{ConfigError, FixError, LoggingError};

/// Errors that stop the CLI before or during a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be set up.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// The batch could not start.
    #[error(transparent)]
    Fix(#[from] FixError),
}
