//! Relative replacement paths and their in-place encoding.

use std::path::{Component, Path};

use crate::encoding::encode_wide;
use crate::error::{RelativePathReason, RewriteError};
use crate::resolver::LEGACY_SEPARATOR;

/// Compute the path of `texture` relative to the directory holding `model`.
///
/// The result always ends with the texture's file name and uses the legacy
/// separator. Returns `None` when either path is relative, has no parent or
/// file name, or the two live on different roots.
pub fn relative_texture_path(model: &Path, texture: &Path) -> Option<String> {
    if !model.is_absolute() || !texture.is_absolute() {
        return None;
    }

    let from = model.parent()?;
    let to = texture.parent()?;
    let name = texture.file_name()?.to_string_lossy();

    let directory = relative_directory(from, to)?;
    let relative = format!("{}{}{}", directory, LEGACY_SEPARATOR, name);

    if Path::new(&relative).has_root() {
        return None;
    }

    Some(relative)
}

/// Relative path between two absolute directories, `.` when equal.
fn relative_directory(from: &Path, to: &Path) -> Option<String> {
    let from: Vec<Component> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = to.components().filter(|c| *c != Component::CurDir).collect();

    if from.iter().chain(to.iter()).any(|c| *c == Component::ParentDir) {
        return None;
    }

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Prefix and root must be shared, otherwise the paths are on
    // different volumes.
    let roots = |components: &[Component]| {
        components
            .iter()
            .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
            .count()
    };
    if common < roots(&from).max(roots(&to)) {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        return Some(".".to_string());
    }

    let separator = LEGACY_SEPARATOR.to_string();
    Some(parts.join(separator.as_str()))
}

/// Encode a replacement path to exactly `capacity` bytes.
///
/// The encoded path is followed by null bytes so that every byte of the
/// original occurrence is overwritten.
pub fn encode_replacement(
    relative: &str,
    texture: &str,
    capacity: usize,
) -> Result<Vec<u8>, RewriteError> {
    if relative.trim().is_empty() {
        return Err(RewriteError::RelativePath {
            texture: texture.to_string(),
            reason: RelativePathReason::Unresolvable,
        });
    }

    let mut bytes = encode_wide(relative);
    if bytes.len() > capacity {
        return Err(RewriteError::RelativePath {
            texture: texture.to_string(),
            reason: RelativePathReason::DoesNotFit {
                needed: bytes.len(),
                capacity,
            },
        });
    }

    bytes.resize(capacity, 0x00);
    Ok(bytes)
}
