//! modelpathfix CLI - Command-line interface
//!
//! Rewrites absolute texture paths in every `.max` model under a root
//! directory so they point at the textures found there, relative to each
//! model.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use modelpathfix::{init_logging, run, FixerConfig};
use tracing::error;

use crate::error::CliError;

/// Make embedded texture paths in legacy model files relative.
#[derive(Debug, Parser)]
#[command(name = "modelpathfix", version, about)]
struct Cli {
    /// Root directory containing models and textures
    #[arg(default_value = ".")]
    root: PathBuf,

    /// INI configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the run's log file
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Report what would be rewritten without modifying any model
    #[arg(long)]
    dry_run: bool,

    /// Show debug output on the console
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Build the run configuration: defaults, then config file, then flags.
    fn resolve_config(&self) -> Result<FixerConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => FixerConfig::load(path)?,
            None => FixerConfig::default(),
        };

        if let Some(dir) = &self.log_dir {
            config = config.with_log_directory(dir);
        }
        if self.dry_run {
            config = config.with_dry_run(true);
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the batch. Errors after logging is up are logged rather than returned.
fn execute(cli: &Cli) -> Result<ExitCode, CliError> {
    let config = cli.resolve_config()?;
    let guard = init_logging(&config.log_directory, cli.verbose)?;
    tracing::debug!(log = %guard.path().display(), "Logging to file");

    match run(&cli.root, &config) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("{} Exiting...", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
