//! Builds nested tree objects from the flat path map in the index.
//!
//! Paths like `src/lib.rs` are folded into a directory hierarchy, then
//! materialized bottom-up: each subtree is written before the tree that
//! references it, so the store never holds a tree pointing at a missing
//! child.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::objects::oid::ObjectId;
use crate::objects::store::{ObjectKind, ObjectStore};
use crate::objects::tree::{EntryMode, Tree, TreeEntry};

/// A node in the in-memory hierarchy: a staged blob or a directory.
enum PathNode {
    Leaf(ObjectId),
    Dir(BTreeMap<String, PathNode>),
}

/// Builds and stores the tree hierarchy for a set of staged paths.
///
/// Returns the ID of the root tree. Equal path maps always yield the same
/// root ID, and no objects are written until the hierarchy is known to be
/// non-empty.
///
/// # Errors
///
/// Returns [`Error::EmptyTree`] if `paths` is empty.
pub fn build_tree<'a, I>(store: &ObjectStore, paths: I) -> Result<ObjectId>
where
    I: IntoIterator<Item = (&'a String, &'a ObjectId)>,
{
    let mut root = BTreeMap::new();
    for (path, id) in paths {
        insert_path(&mut root, path, *id);
    }
    if root.is_empty() {
        return Err(Error::EmptyTree);
    }
    write_dir(store, &root)
}

fn insert_path(dir: &mut BTreeMap<String, PathNode>, path: &str, id: ObjectId) {
    match path.split_once('/') {
        None => {
            dir.insert(path.to_string(), PathNode::Leaf(id));
        }
        Some((first, rest)) => {
            let child = dir
                .entry(first.to_string())
                .or_insert_with(|| PathNode::Dir(BTreeMap::new()));
            if let PathNode::Dir(subdir) = child {
                insert_path(subdir, rest, id);
            } else {
                // A file and a directory share a name; the directory wins.
                let mut subdir = BTreeMap::new();
                insert_path(&mut subdir, rest, id);
                *child = PathNode::Dir(subdir);
            }
        }
    }
}

fn write_dir(store: &ObjectStore, dir: &BTreeMap<String, PathNode>) -> Result<ObjectId> {
    let mut entries = Vec::with_capacity(dir.len());
    for (name, node) in dir {
        let entry = match node {
            PathNode::Leaf(id) => TreeEntry {
                name: name.clone(),
                mode: EntryMode::File,
                id: *id,
            },
            PathNode::Dir(subdir) => TreeEntry {
                name: name.clone(),
                mode: EntryMode::Directory,
                id: write_dir(store, subdir)?,
            },
        };
        entries.push(entry);
    }
    store.write(ObjectKind::Tree, &Tree::new(entries).encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let temp = TempDir::new().unwrap();
        let store = ObjectStore::new(temp.path().join("objects"));
        (temp, store)
    }

    fn blob(store: &ObjectStore, content: &[u8]) -> ObjectId {
        store.write(ObjectKind::Blob, content).unwrap()
    }

    #[test]
    fn test_build_flat_tree() {
        let (_temp, store) = store();
        let a = blob(&store, b"a");
        let b = blob(&store, b"b");
        let paths = BTreeMap::from([("a.txt".to_string(), a), ("b.txt".to_string(), b)]);

        let root = build_tree(&store, &paths).unwrap();
        let tree = Tree::parse(&store.read(&root).unwrap().content).unwrap();
        assert_eq!(tree.entries().len(), 2);
        assert_eq!(tree.find("a.txt").unwrap().id, a);
        assert_eq!(tree.find("a.txt").unwrap().mode, EntryMode::File);
    }

    #[test]
    fn test_build_nested_tree() {
        let (_temp, store) = store();
        let id = blob(&store, b"nested");
        let paths = BTreeMap::from([("src/deep/file.rs".to_string(), id)]);

        let root = build_tree(&store, &paths).unwrap();
        let root_tree = Tree::parse(&store.read(&root).unwrap().content).unwrap();
        let src = root_tree.find("src").unwrap();
        assert_eq!(src.mode, EntryMode::Directory);

        let src_tree = Tree::parse(&store.read(&src.id).unwrap().content).unwrap();
        let deep = src_tree.find("deep").unwrap();
        let deep_tree = Tree::parse(&store.read(&deep.id).unwrap().content).unwrap();
        assert_eq!(deep_tree.find("file.rs").unwrap().id, id);
    }

    #[test]
    fn test_build_deterministic() {
        let (_temp, store) = store();
        let a = blob(&store, b"a");
        let b = blob(&store, b"b");
        let paths = BTreeMap::from([
            ("x/one.txt".to_string(), a),
            ("x/two.txt".to_string(), b),
            ("top.txt".to_string(), a),
        ]);

        let first = build_tree(&store, &paths).unwrap();
        let second = build_tree(&store, &paths).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_empty_writes_nothing() {
        let (_temp, store) = store();
        let paths: BTreeMap<String, ObjectId> = BTreeMap::new();
        assert!(matches!(build_tree(&store, &paths), Err(Error::EmptyTree)));
        // objects/ was never touched
        assert!(!store.root().exists());
    }

    #[test]
    fn test_children_written_before_parents() {
        let (_temp, store) = store();
        let id = blob(&store, b"leaf");
        let paths = BTreeMap::from([("dir/file".to_string(), id)]);

        let root = build_tree(&store, &paths).unwrap();
        let root_tree = Tree::parse(&store.read(&root).unwrap().content).unwrap();
        for entry in root_tree.entries() {
            assert!(store.exists(&entry.id));
        }
    }
}
