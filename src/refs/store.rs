//! Reading and writing HEAD and branch refs.
//!
//! `HEAD` is a symbolic ref, one line: `ref: refs/heads/<branch>\n`.
//! Each branch head lives at `refs/heads/<name>` and holds one line of
//! 40 hex characters. A branch that HEAD names but whose file does not
//! exist yet is unborn: the repository has no commits on it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};
use crate::objects::ObjectId;
use crate::refs::branch::Branch;

const HEAD_PREFIX: &str = "ref: refs/heads/";

/// Ref storage rooted at a repository's metadata directory.
pub struct RefStore {
    git_dir: PathBuf,
}

impl RefStore {
    /// Creates a ref store for the given metadata directory.
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        RefStore {
            git_dir: git_dir.into(),
        }
    }

    fn head_path(&self) -> PathBuf {
        self.git_dir.join("HEAD")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.git_dir.join("refs").join("heads").join(name)
    }

    /// Initializes HEAD to point at the given branch.
    pub fn init_head(&self, branch: &str) -> Result<()> {
        let content = format!("{}{}\n", HEAD_PREFIX, branch);
        write_file_atomic(&self.head_path(), content.as_bytes())
    }

    /// The branch HEAD currently points at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupt`] if HEAD is not a symbolic ref of the
    /// expected form.
    pub fn current_branch(&self) -> Result<String> {
        let data = read_file(&self.head_path())?;
        let text = std::str::from_utf8(&data).map_err(|_| Error::InvalidUtf8)?;
        let line = text.trim_end();
        let branch = line.strip_prefix(HEAD_PREFIX).ok_or_else(|| Error::Corrupt {
            id: String::new(),
            reason: format!("HEAD is not a symbolic ref: {:?}", line),
        })?;
        Ok(branch.to_string())
    }

    /// The commit the current branch points at, or `None` if the branch
    /// is unborn.
    pub fn head_commit(&self) -> Result<Option<ObjectId>> {
        let branch = self.current_branch()?;
        self.read_branch(&branch)
    }

    /// Reads a branch head, or `None` if the branch file does not exist.
    pub fn read_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        match read_file(&self.branch_path(name)) {
            Ok(data) => {
                let text = std::str::from_utf8(&data).map_err(|_| Error::InvalidUtf8)?;
                Ok(Some(ObjectId::from_hex(text.trim_end())?))
            }
            Err(Error::PathNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Points the current branch at a new commit.
    pub fn advance_current_branch(&self, id: ObjectId) -> Result<()> {
        let branch = self.current_branch()?;
        self.write_branch(&branch, id)
    }

    /// Writes a branch head unconditionally.
    pub fn write_branch(&self, name: &str, id: ObjectId) -> Result<()> {
        write_file_atomic(&self.branch_path(name), format!("{}\n", id).as_bytes())
    }

    /// Creates a new branch pointing at the given commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefAlreadyExists`] if the branch exists, or
    /// [`Error::InvalidRefName`] if the name is not acceptable.
    pub fn create_branch(&self, name: &str, id: ObjectId) -> Result<()> {
        validate_branch_name(name)?;
        if self.branch_path(name).exists() {
            return Err(Error::RefAlreadyExists(name.to_string()));
        }
        self.write_branch(name, id)
    }

    /// Lists all branches, sorted by name.
    pub fn branches(&self) -> Result<Vec<Branch>> {
        let current = self.current_branch()?;
        let heads = self.git_dir.join("refs").join("heads");

        let mut branches = Vec::new();
        if heads.is_dir() {
            for entry in fs::read_dir(&heads)? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                let id = self.read_branch(&name)?;
                branches.push(Branch {
                    is_current: name == current,
                    name,
                    id,
                });
            }
        }

        // The current branch is listed even before its first commit.
        if !branches.iter().any(|b| b.name == current) {
            branches.push(Branch {
                name: current,
                id: None,
                is_current: true,
            });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    /// The metadata directory this store is rooted at.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}

/// Checks that a branch name is usable as a single path component.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
        });
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidRefName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn refs() -> (TempDir, RefStore) {
        let temp = TempDir::new().unwrap();
        let store = RefStore::new(temp.path().join(".tinygit"));
        store.init_head("master").unwrap();
        (temp, store)
    }

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_bytes([byte; 20])
    }

    #[test]
    fn test_init_head_format() {
        let (_temp, store) = refs();
        let content = fs::read_to_string(store.git_dir().join("HEAD")).unwrap();
        assert_eq!(content, "ref: refs/heads/master\n");
    }

    #[test]
    fn test_current_branch() {
        let (_temp, store) = refs();
        assert_eq!(store.current_branch().unwrap(), "master");
    }

    #[test]
    fn test_unborn_branch_has_no_commit() {
        let (_temp, store) = refs();
        assert_eq!(store.head_commit().unwrap(), None);
    }

    #[test]
    fn test_advance_and_read() {
        let (_temp, store) = refs();
        store.advance_current_branch(id(1)).unwrap();
        assert_eq!(store.head_commit().unwrap(), Some(id(1)));

        store.advance_current_branch(id(2)).unwrap();
        assert_eq!(store.head_commit().unwrap(), Some(id(2)));
    }

    #[test]
    fn test_branch_file_format() {
        let (_temp, store) = refs();
        store.advance_current_branch(id(0xab)).unwrap();
        let content =
            fs::read_to_string(store.git_dir().join("refs/heads/master")).unwrap();
        assert_eq!(content, format!("{}\n", id(0xab)));
    }

    #[test]
    fn test_create_branch() {
        let (_temp, store) = refs();
        store.create_branch("feature", id(3)).unwrap();
        assert_eq!(store.read_branch("feature").unwrap(), Some(id(3)));
    }

    #[test]
    fn test_create_branch_already_exists() {
        let (_temp, store) = refs();
        store.create_branch("feature", id(3)).unwrap();
        assert!(matches!(
            store.create_branch("feature", id(4)),
            Err(Error::RefAlreadyExists(_))
        ));
    }

    #[test]
    fn test_create_branch_invalid_name() {
        let (_temp, store) = refs();
        for name in ["", "-x", ".hidden", "has space", "a/b", "dot."] {
            assert!(
                matches!(store.create_branch(name, id(1)), Err(Error::InvalidRefName(_))),
                "expected rejection for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_branches_lists_unborn_current() {
        let (_temp, store) = refs();
        let branches = store.branches().unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].name, "master");
        assert!(branches[0].is_current);
        assert_eq!(branches[0].id, None);
    }

    #[test]
    fn test_branches_sorted_with_current_flag() {
        let (_temp, store) = refs();
        store.advance_current_branch(id(1)).unwrap();
        store.create_branch("zoo", id(1)).unwrap();
        store.create_branch("alpha", id(1)).unwrap();

        let branches = store.branches().unwrap();
        let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "master", "zoo"]);
        assert!(branches[1].is_current);
        assert!(!branches[0].is_current);
    }
}
