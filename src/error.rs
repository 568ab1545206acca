//! Error types for tinygit.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for tinygit operations.
///
/// Every variant carries enough structure (the offending path or hash)
/// for a boundary layer to produce an actionable message.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The specified path is not a tinygit repository.
    #[error("not a tinygit repository: {0}")]
    NotARepository(PathBuf),

    /// A repository already exists at the specified path.
    #[error("repository already exists: {0}")]
    AlreadyARepository(PathBuf),

    /// The requested object was not found in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// The specified filesystem path was not found.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// The requested reference was not found.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// The reference already exists.
    #[error("reference already exists: {0}")]
    RefAlreadyExists(String),

    /// The provided string is not a valid reference name.
    #[error("invalid reference name: {0}")]
    InvalidRefName(String),

    /// The provided string is not a valid object ID.
    #[error("invalid object id: {0}")]
    InvalidId(String),

    /// A stored object could not be decoded: decompression failed or the
    /// `"<kind> <len>\0"` header is unparsable.
    #[error("corrupt object {id}: {reason}")]
    Corrupt {
        /// Hex ID of the object, or empty when unknown.
        id: String,
        /// What failed while decoding.
        reason: String,
    },

    /// An operation expected one object kind but found another.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected kind.
        expected: &'static str,
        /// The actual kind.
        actual: &'static str,
    },

    /// Attempted to commit (or build a tree) with nothing staged.
    #[error("nothing to commit: the index is empty")]
    EmptyTree,

    /// Invalid UTF-8 where text was required.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
}

/// Result type alias for tinygit operations.
pub type Result<T> = std::result::Result<T, Error>;
