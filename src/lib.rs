//! tinygit: a minimal version-control core.
//!
//! Content-addressed object storage (blobs, trees, commits), a staging
//! index, a linear commit graph, and the reconciliation logic behind
//! `add`, `commit`, `status`, `checkout`, and `diff`.
//!
//! # Quick Start
//!
//! ```no_run
//! use tinygit::Repository;
//!
//! # fn main() -> tinygit::Result<()> {
//! let repo = Repository::init("/tmp/project")?;
//! std::fs::write("/tmp/project/hello.txt", "hello\n")?;
//!
//! repo.add("hello.txt")?;
//! let id = repo.commit("initial commit")?;
//! println!("committed {}", id.short());
//!
//! for entry in repo.log()? {
//!     let entry = entry?;
//!     println!("{} {}", entry.id.short(), entry.commit.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Overview
//!
//! - [`repository`]: the top-level API tying everything together
//! - [`objects`]: the object model and content-addressed store
//! - [`index`]: the staging area
//! - [`refs`]: HEAD and branch heads
//! - [`status`]: three-way working tree reconciliation
//! - [`diff`]: line diffs between staged and working content
//! - [`log`]: history traversal

pub mod diff;
pub mod error;
pub mod index;
pub mod log;
pub mod objects;
pub mod refs;
pub mod repository;
pub mod status;

pub(crate) mod infra;

pub use diff::{DiffHunk, DiffLine, FileDiff};
pub use error::{Error, Result};
pub use index::Index;
pub use log::{LogEntry, LogIterator};
pub use objects::{
    Blob, Commit, EntryMode, Object, ObjectId, ObjectKind, ObjectStore, Tree, TreeEntry,
};
pub use refs::Branch;
pub use repository::{CheckoutSummary, Repository, DEFAULT_BRANCH, GIT_DIR};
pub use status::{ChangeKind, Status};
