//! Zlib compression and decompression for stored objects.

use crate::error::{Error, Result};

/// Compresses data using zlib at the default level (6).
pub fn compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
}

/// Decompresses zlib-compressed data.
///
/// Validates the 2-byte zlib header before inflating; any failure is
/// reported as a corrupt object (the caller fills in the object ID).
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 2 || !is_valid_zlib_header(data[0], data[1]) {
        return Err(corrupt("invalid zlib header"));
    }

    miniz_oxide::inflate::decompress_to_vec_zlib(data)
        .map_err(|_| corrupt("zlib decompression failed"))
}

fn corrupt(reason: &str) -> Error {
    Error::Corrupt {
        id: String::new(),
        reason: reason.to_string(),
    }
}

/// A valid zlib header has compression method 8 (DEFLATE), a window size
/// of at most 7, and `(CMF * 256 + FLG) % 31 == 0`.
fn is_valid_zlib_header(cmf: u8, flg: u8) -> bool {
    if cmf & 0x0f != 8 {
        return false;
    }
    if (cmf >> 4) > 7 {
        return false;
    }
    ((cmf as u16) * 256 + flg as u16) % 31 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let original = b"Hello, World! This is a test of compression.";
        let compressed = compress(original);
        let decompressed = decompress(&compressed).expect("decompression should succeed");
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_roundtrip_empty() {
        let compressed = compress(b"");
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_compress_reduces_size() {
        let original = vec![b'a'; 1000];
        assert!(compress(&original).len() < original.len());
    }

    #[test]
    fn test_decompress_empty_input() {
        assert!(matches!(decompress(&[]), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_decompress_corrupted_data() {
        let mut compressed = compress(b"Hello, World!");
        compressed[4] ^= 0xff;
        compressed[5] ^= 0xff;
        assert!(matches!(decompress(&compressed), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_decompress_truncated_data() {
        let compressed = compress(b"Hello, World!");
        let truncated = &compressed[..compressed.len() / 2];
        assert!(matches!(decompress(truncated), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_invalid_zlib_header() {
        // Wrong compression method
        assert!(decompress(&[0x00, 0x00, 0x00]).is_err());
        // Valid method but bad checksum
        assert!(decompress(&[0x78, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_is_valid_zlib_header() {
        assert!(is_valid_zlib_header(0x78, 0x9c));
        assert!(is_valid_zlib_header(0x78, 0x01));
        assert!(is_valid_zlib_header(0x78, 0xda));
        assert!(!is_valid_zlib_header(0x79, 0x9c));
        assert!(!is_valid_zlib_header(0x88, 0x00));
        assert!(!is_valid_zlib_header(0x78, 0x00));
    }
}
