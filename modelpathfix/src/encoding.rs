//! Legacy wide text encoding used by old model files.
//!
//! Paths are stored as little-endian 16-bit code units. The locator only ever
//! matches the ASCII subset (high byte `0x00`), but decoding accepts any code
//! unit so that the decoded path is logged faithfully.

/// Bytes per encoded character.
pub const BYTES_PER_CHAR: usize = 2;

/// Decode a legacy wide byte slice into text.
///
/// Unpaired surrogates are replaced with U+FFFD. A trailing odd byte is
/// ignored.
pub fn decode_wide(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(BYTES_PER_CHAR)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Encode text into the legacy wide byte format.
pub fn encode_wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_has_null_high_bytes() {
        let bytes = encode_wide("C:\\a");
        assert_eq!(bytes, vec![b'C', 0, b':', 0, b'\\', 0, b'a', 0]);
    }

    #[test]
    fn test_decode_ascii_path() {
        let bytes = encode_wide("C:\\art\\textures\\wood.tif");
        assert_eq!(decode_wide(&bytes), "C:\\art\\textures\\wood.tif");
    }

    #[test]
    fn test_decode_ignores_trailing_odd_byte() {
        assert_eq!(decode_wide(&[b'A', 0, b'B']), "A");
    }

    #[test]
    fn test_decode_replaces_lone_surrogate() {
        let bytes = [0x00, 0xD8, b'x', 0x00];
        assert_eq!(decode_wide(&bytes), "\u{FFFD}x");
    }
}
