//! Content-addressed loose object storage.
//!
//! Objects are serialized as `"<kind> <byte-length>\0<content>"`, hashed
//! with SHA-1 over those uncompressed bytes, zlib-compressed, and stored
//! under `objects/<first 2 hex chars>/<remaining 38 hex chars>`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::infra::{compress, decompress, hash_object, read_file, write_file_atomic};
use crate::objects::oid::ObjectId;

/// The kind of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// File contents.
    Blob,
    /// A directory snapshot.
    Tree,
    /// A commit.
    Commit,
}

impl ObjectKind {
    /// Returns the kind tag as stored in object headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            other => Err(Error::Corrupt {
                id: String::new(),
                reason: format!("unknown object kind: {}", other),
            }),
        }
    }
}

/// A decoded object: its kind and raw content bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// The object kind from the header.
    pub kind: ObjectKind,
    /// The content bytes, header excluded.
    pub content: Vec<u8>,
}

/// Loose object store rooted at a repository's `objects/` directory.
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Creates a store rooted at the given `objects/` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ObjectStore { root: root.into() }
    }

    /// Maps an object ID to its path in the fan-out layout.
    fn id_to_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    /// Hashes and stores an object, returning its ID.
    ///
    /// Writing is idempotent: if the object already exists it is not
    /// rewritten, and the same content always yields the same ID.
    pub fn write(&self, kind: ObjectKind, content: &[u8]) -> Result<ObjectId> {
        let id = ObjectId::from_bytes(hash_object(kind.as_str(), content));
        let path = self.id_to_path(&id);
        if path.exists() {
            return Ok(id);
        }

        let mut payload = Vec::with_capacity(content.len() + 32);
        payload.extend_from_slice(format!("{} {}\0", kind.as_str(), content.len()).as_bytes());
        payload.extend_from_slice(content);

        write_file_atomic(&path, &compress(&payload))?;
        debug!(id = %id, kind = %kind, size = content.len(), "stored object");
        Ok(id)
    }

    /// Reads and decodes an object by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if no object with the given ID is
    /// stored, and [`Error::Corrupt`] if decompression or header parsing
    /// fails.
    pub fn read(&self, id: &ObjectId) -> Result<RawObject> {
        let path = self.id_to_path(id);
        let compressed = match read_file(&path) {
            Ok(data) => data,
            Err(Error::PathNotFound(_)) => return Err(Error::ObjectNotFound(id.to_hex())),
            Err(e) => return Err(e),
        };

        let payload = decompress(&compressed).map_err(|e| attach_id(e, id))?;
        parse_raw_object(&payload).map_err(|e| attach_id(e, id))
    }

    /// Returns true if an object with the given ID is stored.
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.id_to_path(id).exists()
    }

    /// Finds object IDs whose hex form starts with `prefix`.
    ///
    /// The prefix must be at least 4 hex characters. Returns all matches,
    /// sorted; resolution of ambiguity is the caller's concern.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if prefix.len() < 4 || prefix.len() > 40 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidId(prefix.to_string()));
        }
        let prefix = prefix.to_lowercase();

        let (dir_part, rest) = prefix.split_at(2);
        let dir = self.root.join(dir_part);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(rest) {
                if let Ok(id) = ObjectId::from_hex(&format!("{}{}", dir_part, name)) {
                    matches.push(id);
                }
            }
        }
        matches.sort();
        Ok(matches)
    }

    /// The `objects/` directory this store is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn attach_id(e: Error, id: &ObjectId) -> Error {
    match e {
        Error::Corrupt { reason, .. } => Error::Corrupt {
            id: id.to_hex(),
            reason,
        },
        other => other,
    }
}

/// Parses `"<kind> <len>\0<content>"` into a [`RawObject`].
fn parse_raw_object(payload: &[u8]) -> Result<RawObject> {
    let null_pos = payload.iter().position(|&b| b == 0).ok_or_else(|| Error::Corrupt {
        id: String::new(),
        reason: "missing null byte in header".to_string(),
    })?;

    let header = std::str::from_utf8(&payload[..null_pos]).map_err(|_| Error::Corrupt {
        id: String::new(),
        reason: "header is not valid UTF-8".to_string(),
    })?;

    let (kind_str, len_str) = header.split_once(' ').ok_or_else(|| Error::Corrupt {
        id: String::new(),
        reason: format!("malformed header: {:?}", header),
    })?;

    let kind: ObjectKind = kind_str.parse()?;
    let declared_len: usize = len_str.parse().map_err(|_| Error::Corrupt {
        id: String::new(),
        reason: format!("invalid length in header: {:?}", len_str),
    })?;

    let content = &payload[null_pos + 1..];
    if content.len() != declared_len {
        return Err(Error::Corrupt {
            id: String::new(),
            reason: format!(
                "length mismatch: header says {}, content is {}",
                declared_len,
                content.len()
            ),
        });
    }

    Ok(RawObject {
        kind,
        content: content.to_vec(),
    })
}
