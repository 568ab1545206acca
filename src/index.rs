//! The staging area.
//!
//! The index is a flat map from repository-relative path to blob hash,
//! persisted as JSON. Staging is purely additive: paths are added or
//! re-pointed, never implicitly removed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};
use crate::objects::ObjectId;

/// The staging area: path → staged blob hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: BTreeMap<String, ObjectId>,
}

impl Index {
    /// Creates an empty index.
    pub fn new() -> Self {
        Index::default()
    }

    /// Loads the index from a file.
    ///
    /// A missing or unparsable index file yields an empty index rather
    /// than an error, so a fresh repository needs no special casing. The
    /// leniency is whole-file: one entry with an invalid hash discards
    /// the entire index.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = read_file(path) else {
            return Index::new();
        };
        serde_json::from_slice(&data).unwrap_or_default()
    }

    /// Saves the index to a file, atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| Error::Io(e.into()))?;
        write_file_atomic(path, &json)
    }

    /// Stages a path, replacing any previous entry for it.
    pub fn add(&mut self, path: impl Into<String>, id: ObjectId) {
        self.entries.insert(path.into(), id);
    }

    /// The staged hash for a path, if any.
    pub fn get(&self, path: &str) -> Option<ObjectId> {
        self.entries.get(path).copied()
    }

    /// Removes a path from the index.
    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    /// Replaces the entire contents of the index.
    pub fn replace(&mut self, entries: BTreeMap<String, ObjectId>) {
        self.entries = entries;
    }

    /// Iterates over entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    /// The staged paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of staged paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The index file location inside a repository's metadata directory.
pub fn index_path(git_dir: &Path) -> PathBuf {
    git_dir.join("index")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_bytes([byte; 20])
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let index = Index::load(&temp.path().join("index"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        fs::write(&path, b"{ not json").unwrap();
        assert!(Index::load(&path).is_empty());
    }

    #[test]
    fn test_load_invalid_hash_discards_whole_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        let json = format!(
            "{{\"good.txt\": \"{}\", \"bad.txt\": \"not-hex\"}}",
            id(1).to_hex()
        );
        fs::write(&path, json).unwrap();

        // One bad entry means the file is corrupt; nothing is salvaged.
        assert!(Index::load(&path).is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = Index::new();
        index.add("src/lib.rs", id(1));
        index.add("readme.md", id(2));
        index.save(&path).unwrap();

        let loaded = Index::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("src/lib.rs"), Some(id(1)));
        assert_eq!(loaded.get("readme.md"), Some(id(2)));
    }

    #[test]
    fn test_saved_format_is_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = Index::new();
        index.add("a.txt", id(0xab));
        index.save(&path).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("a.txt").unwrap(), &id(0xab).to_hex());
    }

    #[test]
    fn test_add_replaces_existing_entry() {
        let mut index = Index::new();
        index.add("file", id(1));
        index.add("file", id(2));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("file"), Some(id(2)));
    }

    #[test]
    fn test_iter_in_path_order() {
        let mut index = Index::new();
        index.add("z", id(1));
        index.add("a", id(2));
        index.add("m", id(3));
        let paths: Vec<_> = index.paths().map(String::as_str).collect();
        assert_eq!(paths, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_replace() {
        let mut index = Index::new();
        index.add("old", id(1));
        index.replace(BTreeMap::from([("new".to_string(), id(2))]));
        assert!(index.get("old").is_none());
        assert_eq!(index.get("new"), Some(id(2)));
    }
}
