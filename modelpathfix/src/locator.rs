//! Locates legacy absolute paths inside an opaque model buffer.
//!
//! An embedded absolute path starts with a drive letter in the legacy wide
//! encoding:
//!
//! ```text
//! offset  +0    +1    +2    +3    +4    +5
//!        [A-Z]  00    3A    00    5C    00     "X:\"
//! ```
//!
//! and is terminated by the two-byte marker `40 12`, searched for on 2-byte
//! boundaries within a window of `max_path_chars` characters. The marker is
//! not part of the occurrence.
//!
//! The model format is never parsed. Anything that looks like the signature is
//! a candidate, so scanning resumes one byte past every hit and overlapping
//! signatures are still reported.

use std::ops::Range;

use memchr::memmem::Finder;

use crate::encoding::BYTES_PER_CHAR;

/// Default scan window in characters, mirroring the legacy path limit.
pub const DEFAULT_MAX_PATH_CHARS: usize = 260;

/// Two-byte marker that terminates an embedded path.
pub const END_MARKER: [u8; 2] = [0x40, 0x12];

/// Length of the drive-letter signature in bytes.
const SIGNATURE_LEN: usize = 6;

/// `:\` in the legacy wide encoding. Preceded by the drive letter and its
/// null high byte.
const SIGNATURE_TAIL: &[u8] = &[0x3A, 0x00, 0x5C, 0x00];

/// Offset of [`SIGNATURE_TAIL`] within the signature.
const TAIL_OFFSET: usize = 2;

/// Byte extent of an embedded path within a model buffer.
///
/// Holds indices only; the bytes are borrowed from the owning buffer on
/// demand, so the buffer can be rewritten between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOccurrence {
    start: usize,
    len: usize,
}

impl PathOccurrence {
    /// Create an occurrence covering `[start, start + len)`.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset of the drive letter.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in bytes, excluding the end marker.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for located occurrences; the signature alone is 6 bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte range within the owning buffer.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Borrow the encoded path bytes from the owning buffer.
    pub fn bytes<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.range()]
    }
}

/// A signature match produced by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanHit {
    /// Signature with an end marker inside the window.
    Path(PathOccurrence),
    /// Signature without an end marker inside the window.
    Unterminated { start: usize },
}

impl ScanHit {
    /// Offset of the signature that produced this hit.
    pub fn start(&self) -> usize {
        match self {
            ScanHit::Path(occurrence) => occurrence.start(),
            ScanHit::Unterminated { start } => *start,
        }
    }
}

/// Scans model buffers for legacy absolute paths.
#[derive(Debug, Clone)]
pub struct PathLocator {
    max_path_chars: usize,
    finder: Finder<'static>,
}

impl Default for PathLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PATH_CHARS)
    }
}

impl PathLocator {
    /// Create a locator with the given scan window in characters.
    pub fn new(max_path_chars: usize) -> Self {
        Self {
            max_path_chars,
            finder: Finder::new(SIGNATURE_TAIL),
        }
    }

    /// Scan window in characters.
    pub fn max_path_chars(&self) -> usize {
        self.max_path_chars
    }

    /// Find the first signature starting at or after `from`.
    ///
    /// The buffer may have been modified since the previous call; only the
    /// current contents are inspected.
    pub fn find_next(&self, buffer: &[u8], from: usize) -> Option<ScanHit> {
        let mut pos = from.checked_add(TAIL_OFFSET)?;

        while pos < buffer.len() {
            let tail = pos + self.finder.find(&buffer[pos..])?;
            let start = tail - TAIL_OFFSET;

            if buffer[start].is_ascii_uppercase() && buffer[start + 1] == 0x00 {
                return Some(self.measure(buffer, start));
            }

            pos = tail + 1;
        }

        None
    }

    /// Collect every hit in a buffer that is not being modified.
    pub fn scan(&self, buffer: &[u8]) -> Vec<ScanHit> {
        let mut hits = Vec::new();
        let mut pos = 0;

        while let Some(hit) = self.find_next(buffer, pos) {
            pos = hit.start() + 1;
            hits.push(hit);
        }

        hits
    }

    /// Search for the end marker of a path whose signature is at `start`.
    fn measure(&self, buffer: &[u8], start: usize) -> ScanHit {
        let window = self.max_path_chars.saturating_mul(BYTES_PER_CHAR);
        let mut offset = SIGNATURE_LEN;

        while offset < window && start + offset + 1 < buffer.len() {
            if buffer[start + offset..start + offset + 2] == END_MARKER {
                return ScanHit::Path(PathOccurrence::new(start, offset));
            }
            offset += BYTES_PER_CHAR;
        }

        ScanHit::Unterminated { start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode_wide, encode_wide};

    /// Encode a path followed by the end marker.
    fn terminated(path: &str) -> Vec<u8> {
        let mut bytes = encode_wide(path);
        bytes.extend_from_slice(&END_MARKER);
        bytes
    }

    #[test]
    fn test_empty_buffer_has_no_hits() {
        let locator = PathLocator::default();
        assert!(locator.scan(&[]).is_empty());
        assert!(locator.find_next(&[], 0).is_none());
    }

    #[test]
    fn test_finds_terminated_path() {
        let mut buffer = vec![0xAA; 7];
        buffer.extend(terminated("C:\\art\\wood.tif"));
        buffer.extend([0x01, 0x02, 0x03]);

        let hits = PathLocator::default().scan(&buffer);

        assert_eq!(hits.len(), 1);
        let ScanHit::Path(occurrence) = hits[0] else {
            panic!("expected terminated path, got {:?}", hits[0]);
        };
        assert_eq!(occurrence.start(), 7);
        assert_eq!(occurrence.len(), "C:\\art\\wood.tif".len() * 2);
        assert_eq!(
            decode_wide(occurrence.bytes(&buffer)),
            "C:\\art\\wood.tif"
        );
    }

    #[test]
    fn test_lowercase_drive_letter_is_ignored() {
        let buffer = terminated("c:\\art\\wood.tif");
        assert!(PathLocator::default().scan(&buffer).is_empty());
    }

    #[test]
    fn test_missing_null_high_byte_is_ignored() {
        let buffer = b"C:\\art\\wood.tif@\x12".to_vec();
        assert!(PathLocator::default().scan(&buffer).is_empty());
    }

    #[test]
    fn test_truncated_signature_at_buffer_end() {
        // Five of the six signature bytes.
        let buffer = vec![b'C', 0x00, b':', 0x00, b'\\'];
        assert!(PathLocator::default().scan(&buffer).is_empty());
    }

    #[test]
    fn test_marker_on_odd_offset_is_not_matched() {
        let mut buffer = encode_wide("C:\\ab");
        // Marker straddles a character boundary.
        buffer.extend([0x00, 0x40, 0x12, 0x00]);

        let hits = PathLocator::default().scan(&buffer);
        assert_eq!(hits, vec![ScanHit::Unterminated { start: 0 }]);
    }

    #[test]
    fn test_marker_at_last_window_position() {
        let locator = PathLocator::default();
        let mut buffer = encode_wide("C:\\");
        // Pad to relative offset 518, the last position checked.
        buffer.resize(518, b'x');
        buffer.extend_from_slice(&END_MARKER);

        let hits = locator.scan(&buffer);
        assert_eq!(hits, vec![ScanHit::Path(PathOccurrence::new(0, 518))]);
    }

    #[test]
    fn test_marker_beyond_window_is_unterminated() {
        let locator = PathLocator::default();
        let mut buffer = encode_wide("C:\\");
        buffer.resize(520, b'x');
        buffer.extend_from_slice(&END_MARKER);

        let hits = locator.scan(&buffer);
        assert_eq!(hits, vec![ScanHit::Unterminated { start: 0 }]);
    }

    #[test]
    fn test_custom_window() {
        let locator = PathLocator::new(8);
        let buffer = terminated("C:\\abcdefgh");

        // 11 characters before the marker, window is 8.
        assert_eq!(
            locator.scan(&buffer),
            vec![ScanHit::Unterminated { start: 0 }]
        );
        assert_eq!(locator.max_path_chars(), 8);
    }

    #[test]
    fn test_overlapping_signatures_share_one_marker() {
        // "C:\" immediately followed by "D:\" and "E:\wood.tif" + marker:
        // all three signatures see the same marker within the window.
        let buffer = terminated("C:\\D:\\E:\\wood.tif");

        let hits = PathLocator::default().scan(&buffer);
        let starts: Vec<usize> = hits.iter().map(ScanHit::start).collect();
        assert_eq!(starts, vec![0, 6, 12]);
    }

    #[test]
    fn test_overlapping_signature_after_unterminated_hit() {
        // The marker sits at 524: past the window of the signature at 0,
        // on the last checked offset (518) of the one at 6.
        let mut buffer = encode_wide("C:\\D:\\");
        buffer.resize(524, b'x');
        buffer.extend_from_slice(&END_MARKER);

        let hits = PathLocator::default().scan(&buffer);
        assert_eq!(
            hits,
            vec![
                ScanHit::Unterminated { start: 0 },
                ScanHit::Path(PathOccurrence::new(6, 518)),
            ]
        );
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let locator = PathLocator::new(usize::MAX);
        let buffer = terminated("C:\\a");

        assert_eq!(
            locator.scan(&buffer),
            vec![ScanHit::Path(PathOccurrence::new(0, 8))]
        );
    }

    #[test]
    fn test_unterminated_then_later_path_is_found() {
        let mut buffer = encode_wide("Q:\\never-ends");
        buffer.resize(600, 0x00);
        buffer.extend(terminated("C:\\tex\\a.tga"));

        let hits = PathLocator::default().scan(&buffer);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], ScanHit::Unterminated { start: 0 });
        assert!(matches!(hits[1], ScanHit::Path(occ) if occ.start() == 600));
    }

    #[test]
    fn test_find_next_respects_from() {
        let mut buffer = terminated("C:\\a.tif");
        let second = buffer.len();
        buffer.extend(terminated("D:\\b.tif"));

        let locator = PathLocator::default();
        assert_eq!(locator.find_next(&buffer, 0).map(|h| h.start()), Some(0));
        assert_eq!(locator.find_next(&buffer, 1).map(|h| h.start()), Some(second));
        assert!(locator.find_next(&buffer, second + 1).is_none());
    }

    #[test]
    fn test_find_next_sees_rewritten_bytes() {
        let mut buffer = terminated("C:\\a.tif");
        let locator = PathLocator::default();
        assert!(locator.find_next(&buffer, 0).is_some());

        buffer[0] = b'.';
        assert!(locator.find_next(&buffer, 0).is_none());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_no_colon_means_no_hits(
                buffer in proptest::collection::vec(
                    any::<u8>().prop_filter("no ':'", |b| *b != b':'),
                    0..2048,
                )
            ) {
                prop_assert!(PathLocator::default().scan(&buffer).is_empty());
            }

            #[test]
            fn test_extent_matches_marker_position(
                prefix in proptest::collection::vec(0x60u8..0x7F, 0..64),
                chars in 0usize..=256,
            ) {
                // Path body uses lowercase letters only, so no marker or
                // signature appears before the real marker.
                let mut buffer = prefix.clone();
                buffer.extend(encode_wide("C:\\"));
                buffer.extend(std::iter::repeat([b'q', 0x00]).take(chars).flatten());
                buffer.extend_from_slice(&END_MARKER);

                let hits = PathLocator::default().scan(&buffer);
                let expected = PathOccurrence::new(prefix.len(), 6 + chars * 2);
                prop_assert_eq!(hits, vec![ScanHit::Path(expected)]);
            }
        }
    }
}
