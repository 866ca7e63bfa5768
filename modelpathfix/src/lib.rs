//! modelpathfix - Relative texture paths for legacy model files
//!
//! Old `.max` model files embed absolute texture paths such as
//! `C:\art\textures\wood.tif`, stored two bytes per character. When a project
//! tree moves, those references break. This library finds the embedded paths
//! without parsing the model format, resolves each one to a texture file under
//! the project root and rewrites it in place as a relative path, padded with
//! nulls to the original length.
//!
//! # Pipeline
//!
//! ```text
//! FileDiscovery ──► TextureIndex (built once)
//!       │                  │
//!       ▼                  ▼
//!  model bytes ──► PathLocator ──► TextureResolver ──► encode_replacement
//!                                                           │
//!                           buffer rewritten in place ◄─────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use modelpathfix::{run, FixerConfig};
//!
//! let config = FixerConfig::default().with_dry_run(true);
//! let report = run(Path::new("/projects/castle"), &config)?;
//! println!("{}", report.to_text());
//! # Ok::<(), modelpathfix::FixError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod fixer;
pub mod locator;
pub mod logging;
pub mod relative;
pub mod report;
pub mod resolver;
pub mod texture_index;

pub use config::{ConfigError, FixerConfig};
pub use discovery::{DiscoveredFiles, FileDiscovery};
pub use error::{ErrorKind, FixError, FixResult, RelativePathReason, RewriteError};
pub use fixer::{run, ModelFixer};
pub use locator::{PathLocator, PathOccurrence, ScanHit};
pub use logging::{init_logging, LogGuard, LoggingError};
pub use report::{ModelReport, RewriteCounters, RunReport};
pub use resolver::TextureResolver;
pub use texture_index::{TextureFile, TextureIndex};
