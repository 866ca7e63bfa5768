//! Model and texture discovery under a root directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::FixerConfig;
use crate::texture_index::TextureFile;

/// Files found under the root, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    /// Model files to rewrite.
    pub models: Vec<PathBuf>,
    /// Texture files to index.
    pub textures: Vec<TextureFile>,
}

/// Walks a directory tree collecting models and textures.
///
/// Entries are visited sorted by file name so that discovery order, and with
/// it duplicate-name tie-breaking, does not depend on the filesystem.
#[derive(Debug, Clone)]
pub struct FileDiscovery<'a> {
    root: PathBuf,
    config: &'a FixerConfig,
}

impl<'a> FileDiscovery<'a> {
    /// Create a discovery over `root`.
    pub fn new(root: impl Into<PathBuf>, config: &'a FixerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Root directory being walked.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the root exists and is a directory.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Walk the tree once, sorting files into models and textures.
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn discover(&self) -> DiscoveredFiles {
        let mut found = DiscoveredFiles::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            // Symlinked files count as files; directory links are not walked.
            if !entry.path().is_file() {
                if entry.path_is_symlink() {
                    debug!(path = %entry.path().display(), "Skipping symlink");
                }
                continue;
            }

            let path = entry.into_path();
            if self.config.is_model(&path) {
                found.models.push(path);
            } else if self.config.is_texture(&path) {
                if let Some(texture) = TextureFile::new(path) {
                    found.textures.push(texture);
                }
            }
        }

        debug!(
            root = %self.root.display(),
            models = found.models.len(),
            textures = found.textures.len(),
            "Discovery complete"
        );

        found
    }
}
