//! Fixer configuration.
//!
//! Settings come from built-in defaults, optionally overlaid by an INI file:
//!
//! ```ini
//! [files]
//! model_extensions = max
//! texture_extensions = tif, psd, tga, eps, bmp
//!
//! [scan]
//! max_path_chars = 260
//!
//! [log]
//! directory = /var/log/modelpathfix
//! ```
//!
//! Keys that are absent keep their defaults. Command-line flags are applied
//! last through the `with_*` setters.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::encoding::BYTES_PER_CHAR;
use crate::locator::DEFAULT_MAX_PATH_CHARS;

/// Default model file extensions.
pub const DEFAULT_MODEL_EXTENSIONS: &[&str] = &["max"];

/// Default texture file extensions.
pub const DEFAULT_TEXTURE_EXTENSIONS: &[&str] = &["tif", "psd", "tga", "eps", "bmp"];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("failed to load config {}: {source}", .path.display())]
    Load { path: PathBuf, source: ini::Error },

    /// A key holds a value of the wrong shape.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Settings for a fixer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerConfig {
    /// Extensions (without dot, lowercase) that identify model files.
    pub model_extensions: Vec<String>,
    /// Extensions (without dot, lowercase) that identify texture files.
    pub texture_extensions: Vec<String>,
    /// End-marker scan window in characters.
    pub max_path_chars: usize,
    /// Directory for the per-run log file.
    pub log_directory: PathBuf,
    /// Report what would change without writing model files.
    pub dry_run: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            model_extensions: owned(DEFAULT_MODEL_EXTENSIONS),
            texture_extensions: owned(DEFAULT_TEXTURE_EXTENSIONS),
            max_path_chars: DEFAULT_MAX_PATH_CHARS,
            log_directory: PathBuf::from("."),
            dry_run: false,
        }
    }
}

impl FixerConfig {
    /// Load defaults overlaid with the values in an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(files) = ini.section(Some("files")) {
            if let Some(value) = files.get("model_extensions") {
                config.model_extensions = parse_extensions("files.model_extensions", value)?;
            }
            if let Some(value) = files.get("texture_extensions") {
                config.texture_extensions = parse_extensions("files.texture_extensions", value)?;
            }
        }

        if let Some(value) = ini.section(Some("scan")).and_then(|s| s.get("max_path_chars")) {
            let chars = match value.trim().parse::<usize>() {
                Ok(chars) if chars > 0 && chars.checked_mul(BYTES_PER_CHAR).is_some() => chars,
                _ => return Err(invalid("scan.max_path_chars", value)),
            };
            config = config.with_max_path_chars(chars);
        }

        if let Some(value) = ini.section(Some("log")).and_then(|s| s.get("directory")) {
            if value.trim().is_empty() {
                return Err(invalid("log.directory", value));
            }
            config.log_directory = PathBuf::from(value.trim());
        }

        Ok(config)
    }

    /// Set the log directory.
    pub fn with_log_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.log_directory = directory.into();
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the scan window.
    pub fn with_max_path_chars(mut self, chars: usize) -> Self {
        self.max_path_chars = chars;
        self
    }

    /// Whether a path has a model extension.
    pub fn is_model(&self, path: &Path) -> bool {
        has_extension(path, &self.model_extensions)
    }

    /// Whether a path has a texture extension.
    pub fn is_texture(&self, path: &Path) -> bool {
        has_extension(path, &self.texture_extensions)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn parse_extensions(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let extensions: Vec<String> = value
        .split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    if extensions.is_empty() {
        return Err(invalid(key, value));
    }
    Ok(extensions)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
