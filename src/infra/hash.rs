//! Object hashing.
//!
//! Identity of every stored object is the SHA-1 digest of
//! `"<kind> <byte-length>\0"` followed by the raw content. The digest is
//! computed over the uncompressed bytes.

use sha1::{Digest, Sha1};

/// SHA-1 digest size in bytes.
pub const HASH_SIZE: usize = 20;

/// Computes the object hash for the given kind and content.
///
/// The empty blob hashes to `e69de29bb2d1d6434b8b29ae775ad8c2e48c5391`,
/// matching `git hash-object` for blobs.
pub fn hash_object(kind: &str, content: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(format!("{} {}\0", kind, content.len()).as_bytes());
    hasher.update(content);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_object_empty_blob() {
        let hash = hash_object("blob", b"");
        assert_eq!(hex::encode(hash), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn test_hash_object_hello_blob() {
        // Matches `echo "hello" | git hash-object --stdin`
        let hash = hash_object("blob", b"hello\n");
        assert_eq!(hex::encode(hash), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn test_hash_depends_on_kind() {
        assert_ne!(hash_object("blob", b"abc"), hash_object("tree", b"abc"));
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash_object("blob", b"same"), hash_object("blob", b"same"));
    }
}
