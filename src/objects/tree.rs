//! Tree objects: directory snapshots.
//!
//! A tree is encoded as a sequence of entries, each
//! `"<mode> <name>\0"` followed by the entry's 20 raw hash bytes.
//! Entries are sorted by name, so a given set of entries always encodes
//! to the same bytes and therefore the same hash.

use crate::error::{Error, Result};
use crate::infra::hash::HASH_SIZE;
use crate::objects::oid::ObjectId;

/// File mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// A regular file, mode `100644`.
    File,
    /// A subtree, mode `040000`.
    Directory,
}

impl EntryMode {
    /// The mode string as it appears in the encoded tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File => "100644",
            EntryMode::Directory => "040000",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "100644" => Ok(EntryMode::File),
            "040000" => Ok(EntryMode::Directory),
            other => Err(Error::Corrupt {
                id: String::new(),
                reason: format!("unknown tree entry mode: {}", other),
            }),
        }
    }
}

/// A single entry in a tree: a named file or subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Entry name, a single path component.
    pub name: String,
    /// File or directory mode.
    pub mode: EntryMode,
    /// Hash of the referenced blob or tree.
    pub id: ObjectId,
}

/// A directory snapshot: a sorted list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Creates a tree from entries. The entries are sorted by name, so the
    /// encoding is independent of insertion order.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Tree { entries }
    }

    /// The entries, sorted by name.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Looks up an entry by name.
    pub fn find(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Encodes the tree to its canonical byte form.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_str().as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.name.as_bytes());
            out.push(0);
            out.extend_from_slice(entry.id.as_bytes());
        }
        out
    }

    /// Parses a tree from its encoded byte form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupt`] on a malformed entry: a missing null
    /// byte, an unknown mode, or a truncated hash.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut rest = data;

        while !rest.is_empty() {
            let null_pos = rest.iter().position(|&b| b == 0).ok_or_else(|| corrupt(
                "tree entry missing null byte",
            ))?;

            let header = std::str::from_utf8(&rest[..null_pos])
                .map_err(|_| corrupt("tree entry header is not valid UTF-8"))?;
            let (mode_str, name) = header
                .split_once(' ')
                .ok_or_else(|| corrupt("tree entry missing space separator"))?;
            if name.is_empty() {
                return Err(corrupt("tree entry has empty name"));
            }

            let hash_start = null_pos + 1;
            let hash_end = hash_start + HASH_SIZE;
            if rest.len() < hash_end {
                return Err(corrupt("tree entry hash is truncated"));
            }
            let mut hash = [0u8; HASH_SIZE];
            hash.copy_from_slice(&rest[hash_start..hash_end]);

            entries.push(TreeEntry {
                name: name.to_string(),
                mode: EntryMode::parse(mode_str)?,
                id: ObjectId::from_bytes(hash),
            });
            rest = &rest[hash_end..];
        }

        Ok(Tree::new(entries))
    }
}

fn corrupt(reason: &str) -> Error {
    Error::Corrupt {
        id: String::new(),
        reason: reason.to_string(),
    }
}
