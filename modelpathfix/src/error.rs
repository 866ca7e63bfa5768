//! Error types for the path fixer.
//!
//! Two tiers of failure exist. [`RewriteError`] covers a single embedded path
//! that could not be rewritten; it is always recovered locally by skipping
//! the occurrence. [`FixError`] covers a whole model file or the batch itself.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for model-level operations.
pub type FixResult<T> = Result<T, FixError>;

/// Classification of a per-occurrence failure.
///
/// Each kind has its own counter in [`RewriteCounters`](crate::report::RewriteCounters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No end marker within the scan window.
    Offset,
    /// Referenced file name is not in the texture index.
    TextureNotFound,
    /// Relative path could not be computed or does not fit.
    RelativePath,
}

impl ErrorKind {
    /// Label used in log lines and the final summary.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Offset => "ERR_OFFSET",
            ErrorKind::TextureNotFound => "ERR_TEXTURE_NOT_FOUND",
            ErrorKind::RelativePath => "ERR_RELATIVE_PATH",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reason a relative replacement path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePathReason {
    /// The computation failed or produced an empty result.
    Unresolvable,
    /// The encoded path is longer than the original occurrence.
    DoesNotFit { needed: usize, capacity: usize },
}

impl fmt::Display for RelativePathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativePathReason::Unresolvable => write!(f, "Could not get relative path!"),
            RelativePathReason::DoesNotFit { needed, capacity } => write!(
                f,
                "Relative path does not fit! ({} bytes needed, {} available)",
                needed, capacity
            ),
        }
    }
}

/// A single embedded path that could not be rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Signature found but no end marker within the scan window.
    #[error("Could not find end marker for path at index={offset}!")]
    MissingEndMarker { offset: usize },

    /// The referenced texture does not exist anywhere under the root.
    #[error("Texture=\"{name}\" - Could not find this texture!")]
    TextureNotFound { name: String },

    /// Relative path computation failed or the result exceeds capacity.
    #[error("Texture=\"{texture}\" - {reason}")]
    RelativePath {
        texture: String,
        reason: RelativePathReason,
    },
}

impl RewriteError {
    /// Get the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RewriteError::MissingEndMarker { .. } => ErrorKind::Offset,
            RewriteError::TextureNotFound { .. } => ErrorKind::TextureNotFound,
            RewriteError::RelativePath { .. } => ErrorKind::RelativePath,
        }
    }
}

/// Errors affecting a whole model file or the batch.
#[derive(Debug, Error)]
pub enum FixError {
    /// The root directory does not exist or is not a directory.
    #[error("Path not found at \"{}\"!", .0.display())]
    RootNotFound(PathBuf),

    /// Failed to read a model file.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a model file back.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}
