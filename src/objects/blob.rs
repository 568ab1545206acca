//! Blob objects: raw file contents.

/// A blob holds the exact bytes of a file, with no metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content: Vec<u8>,
}

impl Blob {
    /// Creates a blob from raw bytes.
    pub fn new(content: Vec<u8>) -> Self {
        Blob { content }
    }

    /// The blob's content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consumes the blob, returning its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Content size in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_preserves_bytes() {
        let blob = Blob::new(vec![0x00, 0xff, 0x42]);
        assert_eq!(blob.content(), &[0x00, 0xff, 0x42]);
        assert_eq!(blob.len(), 3);
        assert!(!blob.is_empty());
    }

    #[test]
    fn test_empty_blob() {
        let blob = Blob::new(Vec::new());
        assert!(blob.is_empty());
        assert_eq!(blob.len(), 0);
    }
}
