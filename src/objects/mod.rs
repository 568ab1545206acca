//! The object model: blobs, trees, commits, and the store they live in.

pub mod blob;
pub mod builder;
pub mod commit;
pub mod oid;
pub mod store;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use oid::ObjectId;
pub use store::{ObjectKind, ObjectStore, RawObject};
pub use tree::{EntryMode, Tree, TreeEntry};

use crate::error::{Error, Result};

/// A fully decoded object of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// File contents.
    Blob(Blob),
    /// A directory snapshot.
    Tree(Tree),
    /// A commit.
    Commit(Commit),
}

impl Object {
    /// Decodes a raw object into its typed form.
    pub fn decode(raw: &RawObject) -> Result<Self> {
        match raw.kind {
            ObjectKind::Blob => Ok(Object::Blob(Blob::new(raw.content.clone()))),
            ObjectKind::Tree => Ok(Object::Tree(Tree::parse(&raw.content)?)),
            ObjectKind::Commit => Ok(Object::Commit(Commit::parse(&raw.content)?)),
        }
    }

    /// The kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => ObjectKind::Blob,
            Object::Tree(_) => ObjectKind::Tree,
            Object::Commit(_) => ObjectKind::Commit,
        }
    }

    /// Returns the blob, or a type mismatch error.
    pub fn into_blob(self) -> Result<Blob> {
        match self {
            Object::Blob(blob) => Ok(blob),
            other => Err(mismatch("blob", other.kind())),
        }
    }

    /// Returns the tree, or a type mismatch error.
    pub fn into_tree(self) -> Result<Tree> {
        match self {
            Object::Tree(tree) => Ok(tree),
            other => Err(mismatch("tree", other.kind())),
        }
    }

    /// Returns the commit, or a type mismatch error.
    pub fn into_commit(self) -> Result<Commit> {
        match self {
            Object::Commit(commit) => Ok(commit),
            other => Err(mismatch("commit", other.kind())),
        }
    }
}

fn mismatch(expected: &'static str, actual: ObjectKind) -> Error {
    Error::TypeMismatch {
        expected,
        actual: actual.as_str(),
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}
