//! Commit history traversal.
//!
//! History is a linear chain: each commit has at most one parent, so the
//! walk is a simple iterator from HEAD back to the root commit.

use crate::error::Result;
use crate::objects::{Commit, Object, ObjectId, ObjectStore};

/// A commit paired with its ID, as produced by the history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// The commit's ID.
    pub id: ObjectId,
    /// The decoded commit.
    pub commit: Commit,
}

/// Iterator over commits from a starting point back to the root.
pub struct LogIterator<'a> {
    store: &'a ObjectStore,
    next: Option<ObjectId>,
}

impl<'a> LogIterator<'a> {
    /// Starts a walk at the given commit. `None` yields an empty walk,
    /// matching an unborn branch.
    pub fn new(store: &'a ObjectStore, start: Option<ObjectId>) -> Self {
        LogIterator { store, next: start }
    }

    fn read_commit(&self, id: ObjectId) -> Result<LogEntry> {
        let raw = self.store.read(&id)?;
        let commit = Object::decode(&raw)?.into_commit()?;
        Ok(LogEntry { id, commit })
    }
}

impl Iterator for LogIterator<'_> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.read_commit(id) {
            Ok(entry) => {
                self.next = entry.commit.parent();
                Some(Ok(entry))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
