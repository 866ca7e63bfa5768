//! Resolution of a hardcoded path to an indexed texture.
//!
//! The file name selects the candidate list. When several textures share the
//! name, each candidate is scored by walking both paths backward from the
//! file name and recording the deepest position at which the segments are
//! equal. Closer mismatches do not stop the walk, so the score is the maximum
//! matching backward index rather than the length of a common suffix:
//!
//! ```text
//! hardcoded:  D:\ old \ siteB \ wood.tif
//! candidate:  ...\ textures \ siteB \ wood.tif
//! position:         2        1        0
//! match:            no       yes      yes    -> depth 2
//! ```
//!
//! The highest depth wins; ties go to the earliest candidate in discovery
//! order, and a candidate list with no match at all falls back to its first
//! entry.

use crate::error::RewriteError;
use crate::texture_index::{TextureFile, TextureIndex};

/// Separator used by hardcoded paths.
pub const LEGACY_SEPARATOR: char = '\\';

/// Resolves hardcoded paths against a texture index.
#[derive(Debug, Clone, Copy)]
pub struct TextureResolver<'a> {
    index: &'a TextureIndex,
}

impl<'a> TextureResolver<'a> {
    /// Create a resolver over a built index.
    pub fn new(index: &'a TextureIndex) -> Self {
        Self { index }
    }

    /// Select the texture a hardcoded path refers to.
    pub fn resolve(&self, hardcoded: &str) -> Result<&'a TextureFile, RewriteError> {
        let segments: Vec<&str> = hardcoded.split(LEGACY_SEPARATOR).collect();
        let name = segments.last().copied().unwrap_or_default();

        let candidates = self
            .index
            .candidates(&name.to_lowercase())
            .filter(|list| !list.is_empty())
            .ok_or_else(|| RewriteError::TextureNotFound {
                name: name.to_string(),
            })?;

        if candidates.len() == 1 {
            return Ok(&candidates[0]);
        }

        Ok(select_candidate(&segments, candidates))
    }
}

/// Pick the best candidate for the given hardcoded path segments.
fn select_candidate<'t>(segments: &[&str], candidates: &'t [TextureFile]) -> &'t TextureFile {
    let mut best = 0;
    let mut best_depth = 0;

    for (i, candidate) in candidates.iter().enumerate() {
        let candidate_path = candidate.path().to_string_lossy();
        let depth = match_depth(segments, &path_segments(&candidate_path));
        if depth > best_depth {
            best_depth = depth;
            best = i;
        }
    }

    &candidates[best]
}

/// Deepest backward position at which both segment lists agree, plus one.
///
/// Compares as many positions as `original` has directory segments. Positions
/// past the start of `candidate` count as mismatches.
pub fn match_depth(original: &[&str], candidate: &[&str]) -> usize {
    let mut depth = 0;

    for j in 0..original.len().saturating_sub(1) {
        let Some(candidate_index) = candidate.len().checked_sub(j + 1) else {
            break;
        };
        if original[original.len() - j - 1] == candidate[candidate_index] {
            depth = j + 1;
        }
    }

    depth
}

/// Split a filesystem path on either separator, dropping empty segments.
fn path_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect()
}
