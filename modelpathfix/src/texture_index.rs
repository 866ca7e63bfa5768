//! Lookup of texture files by case-insensitive base name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// A texture file discovered under the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureFile {
    path: PathBuf,
    name: String,
    key: String,
}

impl TextureFile {
    /// Create a texture entry from its full path.
    ///
    /// Returns `None` if the path has no file name.
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let key = name.to_lowercase();
        Some(Self { path, name, key })
    }

    /// Full path of the texture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name with its original case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase base name used as the index key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Texture files grouped by lowercase base name.
///
/// Each list keeps discovery order, which makes later disambiguation
/// deterministic for a fixed traversal.
#[derive(Debug, Clone, Default)]
pub struct TextureIndex {
    entries: HashMap<String, Vec<TextureFile>>,
    duplicates: Vec<String>,
    len: usize,
}

impl TextureIndex {
    /// Build the index from textures in discovery order.
    ///
    /// A name shared by several files is logged once per additional file and
    /// remembered in [`duplicate_names`](Self::duplicate_names).
    pub fn build(textures: impl IntoIterator<Item = TextureFile>) -> Self {
        let mut index = Self::default();

        for texture in textures {
            index.insert(texture);
        }

        index
    }

    fn insert(&mut self, texture: TextureFile) {
        let list = self.entries.entry(texture.key().to_string()).or_default();

        if !list.is_empty() {
            warn!("NOTE - Duplicate texture file name found! {}", texture.key());
            if list.len() == 1 {
                self.duplicates.push(texture.key().to_string());
            }
        }

        list.push(texture);
        self.len += 1;
    }

    /// Candidates for a lowercase base name, in discovery order.
    pub fn candidates(&self, key: &str) -> Option<&[TextureFile]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Names shared by more than one texture, in the order first detected.
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicates
    }

    /// Number of distinct names.
    pub fn name_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of indexed textures.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no textures.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(path: &str) -> TextureFile {
        TextureFile::new(path).unwrap()
    }

    #[test]
    fn test_texture_file_key_is_lowercase() {
        let tex = texture("/root/textures/Wood.TIF");
        assert_eq!(tex.name(), "Wood.TIF");
        assert_eq!(tex.key(), "wood.tif");
        assert_eq!(tex.path(), Path::new("/root/textures/Wood.TIF"));
    }

    #[test]
    fn test_texture_file_without_name() {
        assert!(TextureFile::new("/").is_none());
    }

    #[test]
    fn test_build_empty() {
        let index = TextureIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.candidates("wood.tif").is_none());
    }

    #[test]
    fn test_lookup_is_keyed_by_lowercase_name() {
        let index = TextureIndex::build(vec![texture("/r/WOOD.tif"), texture("/r/stone.tga")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.name_count(), 2);
        assert_eq!(index.candidates("wood.tif").unwrap().len(), 1);
        assert!(index.candidates("WOOD.tif").is_none());
        assert!(index.duplicate_names().is_empty());
    }

    #[test]
    fn test_duplicates_keep_discovery_order() {
        let index = TextureIndex::build(vec![
            texture("/r/b/wood.tif"),
            texture("/r/a/Wood.tif"),
            texture("/r/c/WOOD.TIF"),
        ]);

        let candidates = index.candidates("wood.tif").unwrap();
        let paths: Vec<&Path> = candidates.iter().map(TextureFile::path).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/r/b/wood.tif"),
                Path::new("/r/a/Wood.tif"),
                Path::new("/r/c/WOOD.TIF"),
            ]
        );
        assert_eq!(index.len(), 3);
        assert_eq!(index.name_count(), 1);
        assert_eq!(index.duplicate_names(), ["wood.tif".to_string()]);
    }
}
