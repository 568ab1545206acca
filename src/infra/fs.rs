//! Filesystem helpers shared by the object store, index, and refs.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Reads a file's full contents.
///
/// Maps a missing file to [`Error::PathNotFound`] so callers get the path
/// in the error instead of a bare I/O message.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Writes a file atomically: write to a sibling temp file, then rename.
///
/// Parent directories are created as needed. Readers never observe a
/// partially written file.
pub fn write_file_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;
    fs::create_dir_all(parent)?;

    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;
    let tmp_path = parent.join(format!(".{}.tmp", file_name));

    fs::write(&tmp_path, data)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Lists all regular files under `root`, as sorted slash-separated paths
/// relative to `root`.
///
/// The repository metadata directory and any `.git` directory are skipped.
pub fn list_working_tree(root: &Path, metadata_dir: &str) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        !(entry.file_type().is_dir() && (name == metadata_dir || name == ".git"))
    });

    for entry in walker {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "directory walk failed",
            )),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| Error::PathNotFound(entry.path().to_path_buf()))?;
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        paths.push(joined);
    }

    paths.sort();
    Ok(paths)
}

/// Normalizes a caller-supplied repository path.
///
/// Drops `.` and empty components, so `./a.txt`, `sub//b.txt`, and
/// `dir/` become `a.txt`, `sub/b.txt`, and `dir`. An input with no
/// remaining components (`.`, `./`) names the repository root and
/// normalizes to `.`.
pub fn normalize_repo_path(path: &str) -> String {
    let parts: Vec<&str> = path
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Converts a slash-separated repository path to a filesystem path under `root`.
pub fn to_fs_path(root: &Path, repo_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in repo_path.split('/') {
        path.push(part);
    }
    path
}
