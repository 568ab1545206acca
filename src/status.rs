//! Working tree status.
//!
//! Status reconciles three snapshots of the repository: the HEAD commit's
//! tree, the index, and the working tree. Each comparison is independent,
//! so one path can appear in more than one list (staged then modified
//! again, for example).

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::infra::hash_object;
use crate::objects::{ObjectId, ObjectKind, ObjectStore, Tree};

/// How a path changed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    /// Present in the newer snapshot only.
    Added,
    /// Present in both, with different content.
    Modified,
    /// Present in the older snapshot only.
    Deleted,
}

/// The result of a status reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Index vs HEAD: changes that the next commit will record.
    pub staged: Vec<(String, ChangeKind)>,
    /// Working tree vs index: changes not yet staged.
    pub unstaged: Vec<(String, ChangeKind)>,
    /// Working tree paths the index knows nothing about.
    pub untracked: Vec<String>,
}

impl Status {
    /// Returns true if nothing is staged, modified, or untracked.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

/// Flattens a tree into a map from slash-separated path to blob hash.
pub fn flatten_tree(
    store: &ObjectStore,
    tree_id: &ObjectId,
    prefix: &str,
    out: &mut BTreeMap<String, ObjectId>,
) -> Result<()> {
    let raw = store.read(tree_id)?;
    if raw.kind != ObjectKind::Tree {
        return Err(Error::TypeMismatch {
            expected: "tree",
            actual: raw.kind.as_str(),
        });
    }
    let tree = Tree::parse(&raw.content)?;

    for entry in tree.entries() {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };
        match entry.mode {
            crate::objects::EntryMode::File => {
                out.insert(path, entry.id);
            }
            crate::objects::EntryMode::Directory => {
                flatten_tree(store, &entry.id, &path, out)?;
            }
        }
    }
    Ok(())
}

/// Computes status from the HEAD tree, the index, and the working tree.
///
/// `head_tree` is `None` before the first commit, in which case every
/// staged path counts as added. `working` maps each working-tree path to
/// its current content bytes.
pub fn compute_status(
    head_tree: &BTreeMap<String, ObjectId>,
    index: &Index,
    working: &BTreeMap<String, Vec<u8>>,
) -> Status {
    let mut status = Status::default();

    // Index vs HEAD: what the next commit will record.
    for (path, staged_id) in index.iter() {
        match head_tree.get(path) {
            None => status.staged.push((path.clone(), ChangeKind::Added)),
            Some(head_id) if head_id != staged_id => {
                status.staged.push((path.clone(), ChangeKind::Modified))
            }
            Some(_) => {}
        }
    }
    for path in head_tree.keys() {
        if index.get(path).is_none() {
            status.staged.push((path.clone(), ChangeKind::Deleted));
        }
    }

    // Working tree vs index: changes not yet staged.
    for (path, staged_id) in index.iter() {
        match working.get(path) {
            None => status.unstaged.push((path.clone(), ChangeKind::Deleted)),
            Some(content) => {
                let working_id =
                    ObjectId::from_bytes(hash_object(ObjectKind::Blob.as_str(), content));
                if working_id != *staged_id {
                    status.unstaged.push((path.clone(), ChangeKind::Modified));
                }
            }
        }
    }

    // Untracked: in the working tree, unknown to the index.
    for path in working.keys() {
        if index.get(path).is_none() {
            status.untracked.push(path.clone());
        }
    }

    status.staged.sort();
    status.unstaged.sort();
    status.untracked.sort();
    status
}
