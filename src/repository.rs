//! The top-level repository API.
//!
//! A [`Repository`] ties together the object store, the index, and the
//! refs under a single working directory, and exposes the porcelain
//! operations: add, commit, status, log, checkout, branch, and diff.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::diff::FileDiff;
use crate::error::{Error, Result};
use crate::index::{index_path, Index};
use crate::infra::{
    list_working_tree, normalize_repo_path, read_file, to_fs_path, write_file_atomic,
};
use crate::log::LogIterator;
use crate::objects::builder::build_tree;
use crate::objects::{Commit, Object, ObjectId, ObjectKind, ObjectStore};
use crate::refs::{Branch, RefStore};
use crate::status::{compute_status, flatten_tree, Status};

/// Name of the repository metadata directory.
pub const GIT_DIR: &str = ".tinygit";

/// Branch created by `init`.
pub const DEFAULT_BRANCH: &str = "master";

const DEFAULT_AUTHOR: &str = "tinygit user";

/// What a checkout did to the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Paths created in the working tree.
    pub created: Vec<String>,
    /// Paths whose content was replaced.
    pub updated: Vec<String>,
    /// Paths removed from the working tree.
    pub deleted: Vec<String>,
}

/// An open repository.
pub struct Repository {
    work_dir: PathBuf,
    git_dir: PathBuf,
    store: ObjectStore,
    refs: RefStore,
    author: String,
}

impl Repository {
    /// Initializes a new repository at `path`.
    ///
    /// Creates the metadata directory with an empty object store and HEAD
    /// pointing at the unborn default branch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyARepository`] if `path` already contains a
    /// metadata directory.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let work_dir = path.as_ref().to_path_buf();
        let git_dir = work_dir.join(GIT_DIR);
        if git_dir.exists() {
            return Err(Error::AlreadyARepository(work_dir));
        }

        fs::create_dir_all(git_dir.join("objects"))?;
        fs::create_dir_all(git_dir.join("refs").join("heads"))?;
        let refs = RefStore::new(&git_dir);
        refs.init_head(DEFAULT_BRANCH)?;
        Index::new().save(&index_path(&git_dir))?;

        info!(path = %work_dir.display(), "initialized empty repository");
        Ok(Repository::assemble(work_dir, git_dir))
    }

    /// Opens an existing repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] if `path` has no metadata
    /// directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let work_dir = path.as_ref().to_path_buf();
        let git_dir = work_dir.join(GIT_DIR);
        if !git_dir.is_dir() {
            return Err(Error::NotARepository(work_dir));
        }
        Ok(Repository::assemble(work_dir, git_dir))
    }

    /// Opens the repository containing `path`, walking up parent
    /// directories until a metadata directory is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let start = path.as_ref();
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(GIT_DIR).is_dir() {
                return Repository::open(dir);
            }
            current = dir.parent();
        }
        Err(Error::NotARepository(start.to_path_buf()))
    }

    fn assemble(work_dir: PathBuf, git_dir: PathBuf) -> Self {
        let store = ObjectStore::new(git_dir.join("objects"));
        let refs = RefStore::new(&git_dir);
        Repository {
            work_dir,
            git_dir,
            store,
            refs,
            author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// The working directory root.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The metadata directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Sets the author identity recorded in new commits.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Stages a file or directory.
    ///
    /// A directory is staged recursively. Each file's content is written
    /// as a blob and the index entry is set to its hash; entries for other
    /// paths are untouched. The input is normalized first, so `./a.txt`
    /// and `a.txt` stage the same index entry.
    ///
    /// Returns the staged paths, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if `path` does not exist in the
    /// working tree.
    pub fn add(&self, path: &str) -> Result<Vec<String>> {
        let path = normalize_repo_path(path);
        let fs_path = to_fs_path(&self.work_dir, &path);

        let mut staged = Vec::new();
        let mut index = self.load_index();
        if fs_path.is_file() {
            self.stage_file(&mut index, &path)?;
            staged.push(path);
        } else if fs_path.is_dir() {
            for file in list_working_tree(&fs_path, GIT_DIR)? {
                let full = if path == "." {
                    file
                } else {
                    format!("{}/{}", path, file)
                };
                self.stage_file(&mut index, &full)?;
                staged.push(full);
            }
        } else {
            return Err(Error::PathNotFound(fs_path));
        }

        index.save(&index_path(&self.git_dir))?;
        staged.sort();
        debug!(count = staged.len(), "staged paths");
        Ok(staged)
    }

    fn stage_file(&self, index: &mut Index, path: &str) -> Result<()> {
        let content = read_file(&to_fs_path(&self.work_dir, path))?;
        let id = self.store.write(ObjectKind::Blob, &content)?;
        index.add(path, id);
        Ok(())
    }

    /// Builds and stores the tree hierarchy for the current index,
    /// returning the root tree ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if nothing is staged.
    pub fn write_tree(&self) -> Result<ObjectId> {
        let index = self.load_index();
        build_tree(&self.store, index.iter())
    }

    /// Records the index as a new commit on the current branch.
    ///
    /// The new commit's parent is the current branch head, or none for
    /// the first commit. The branch ref is advanced to the new commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTree`] if nothing is staged.
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        let tree = self.write_tree()?;
        let parent = self.refs.head_commit()?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let commit = Commit::new(tree, parent, self.author.clone(), timestamp, message);
        let id = self.store.write(ObjectKind::Commit, &commit.encode())?;

        self.refs.advance_current_branch(id)?;
        info!(id = %id.short(), branch = %self.refs.current_branch()?, "created commit");
        Ok(id)
    }

    /// Walks history from the current branch head back to the root.
    pub fn log(&self) -> Result<LogIterator<'_>> {
        let head = self.refs.head_commit()?;
        Ok(LogIterator::new(&self.store, head))
    }

    /// Resolves a full or abbreviated hex ID to a stored object ID.
    ///
    /// Abbreviations need at least 4 hex characters and must match
    /// exactly one object.
    pub fn resolve(&self, rev: &str) -> Result<ObjectId> {
        if rev.len() == 40 {
            let id = ObjectId::from_hex(rev)?;
            if !self.store.exists(&id) {
                return Err(Error::ObjectNotFound(rev.to_string()));
            }
            return Ok(id);
        }

        let matches = self.store.find_by_prefix(rev)?;
        match matches.len() {
            0 => Err(Error::ObjectNotFound(rev.to_string())),
            1 => Ok(matches[0]),
            _ => Err(Error::InvalidId(format!("ambiguous prefix: {}", rev))),
        }
    }

    /// Reads and decodes the object named by a full or abbreviated ID.
    pub fn read_object(&self, rev: &str) -> Result<Object> {
        let id = self.resolve(rev)?;
        Object::decode(&self.store.read(&id)?)
    }

    /// Computes the status of the working tree against HEAD and the index.
    pub fn status(&self) -> Result<Status> {
        let head_tree = self.head_tree_paths()?;
        let index = self.load_index();
        let working = self.working_tree_contents()?;
        Ok(compute_status(&head_tree, &index, &working))
    }

    /// Resets the working tree and index to the given commit, and points
    /// the current branch at it.
    ///
    /// Checkout is destructive: files that differ from the target are
    /// overwritten, and files tracked by the index but absent from the
    /// target are removed. Untracked files are left alone.
    pub fn checkout(&self, rev: &str) -> Result<CheckoutSummary> {
        let commit_id = self.resolve(rev)?;
        let commit = self.read_commit(commit_id)?;

        let mut target = BTreeMap::new();
        flatten_tree(&self.store, &commit.tree(), "", &mut target)?;

        let mut index = self.load_index();
        let mut summary = CheckoutSummary::default();

        for (path, target_id) in &target {
            match index.get(path) {
                Some(current) if current == *target_id => continue,
                Some(_) => summary.updated.push(path.clone()),
                None => summary.created.push(path.clone()),
            }
            let raw = self.store.read(target_id)?;
            write_file_atomic(&to_fs_path(&self.work_dir, path), &raw.content)?;
        }

        for (path, _) in index.iter() {
            if !target.contains_key(path) {
                let fs_path = to_fs_path(&self.work_dir, path);
                if fs_path.exists() {
                    fs::remove_file(&fs_path)?;
                }
                summary.deleted.push(path.clone());
            }
        }

        index.replace(target);
        index.save(&index_path(&self.git_dir))?;
        self.refs.advance_current_branch(commit_id)?;

        info!(
            id = %commit_id.short(),
            created = summary.created.len(),
            updated = summary.updated.len(),
            deleted = summary.deleted.len(),
            "checked out commit"
        );
        Ok(summary)
    }

    /// Lists branches, sorted by name.
    pub fn branches(&self) -> Result<Vec<Branch>> {
        self.refs.branches()
    }

    /// Creates a branch at the current branch head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RefNotFound`] if the current branch has no
    /// commits yet.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let head = self
            .refs
            .head_commit()?
            .ok_or_else(|| Error::RefNotFound(self.refs.current_branch().unwrap_or_default()))?;
        self.refs.create_branch(name, head)
    }

    /// Diffs each staged file against its working-tree version.
    ///
    /// Unchanged files are skipped. A staged file missing from the working
    /// tree yields a deletion marker; non-text content yields a binary
    /// marker.
    pub fn diff(&self) -> Result<Vec<FileDiff>> {
        let index = self.load_index();
        let mut diffs = Vec::new();

        for (path, staged_id) in index.iter() {
            let staged = self.store.read(staged_id)?.content;
            let fs_path = to_fs_path(&self.work_dir, path);

            let file_diff = match read_file(&fs_path) {
                Ok(working) => {
                    let d = FileDiff::compute(path.clone(), &staged, &working);
                    if d.is_unchanged() {
                        continue;
                    }
                    d
                }
                Err(Error::PathNotFound(_)) => FileDiff::deleted(path.clone()),
                Err(e) => return Err(e),
            };
            diffs.push(file_diff);
        }
        Ok(diffs)
    }

    fn load_index(&self) -> Index {
        Index::load(&index_path(&self.git_dir))
    }

    fn read_commit(&self, id: ObjectId) -> Result<Commit> {
        Object::decode(&self.store.read(&id)?)?.into_commit()
    }

    fn head_tree_paths(&self) -> Result<BTreeMap<String, ObjectId>> {
        let mut paths = BTreeMap::new();
        if let Some(head) = self.refs.head_commit()? {
            let commit = self.read_commit(head)?;
            flatten_tree(&self.store, &commit.tree(), "", &mut paths)?;
        }
        Ok(paths)
    }

    fn working_tree_contents(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut contents = BTreeMap::new();
        for path in list_working_tree(&self.work_dir, GIT_DIR)? {
            let data = read_file(&to_fs_path(&self.work_dir, &path))?;
            contents.insert(path, data);
        }
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_layout() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        assert!(repo.git_dir().join("objects").is_dir());
        assert!(repo.git_dir().join("refs/heads").is_dir());
        assert!(repo.git_dir().join("HEAD").is_file());
        assert!(repo.git_dir().join("index").is_file());
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        assert!(matches!(
            Repository::init(temp.path()),
            Err(Error::AlreadyARepository(_))
        ));
    }

    #[test]
    fn test_open_missing() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Repository::open(temp.path()),
            Err(Error::NotARepository(_))
        ));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let sub = temp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();

        let repo = Repository::discover(&sub).unwrap();
        assert_eq!(repo.work_dir(), temp.path());
    }

    #[test]
    fn test_add_missing_path() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        assert!(matches!(repo.add("no-such-file"), Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_commit_empty_index() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        assert!(matches!(repo.commit("nothing"), Err(Error::EmptyTree)));
    }

    #[test]
    fn test_resolve_short_hash() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        fs::write(temp.path().join("f.txt"), b"content\n").unwrap();
        repo.add("f.txt").unwrap();
        let id = repo.commit("first").unwrap();

        assert_eq!(repo.resolve(&id.to_hex()[..7]).unwrap(), id);
        assert_eq!(repo.resolve(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_resolve_unknown() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        assert!(matches!(
            repo.resolve("deadbeef"),
            Err(Error::ObjectNotFound(_))
        ));
    }
}
