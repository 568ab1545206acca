//! Internal infrastructure: hashing, compression, filesystem helpers.

pub(crate) mod compression;
pub(crate) mod fs;
pub(crate) mod hash;

pub(crate) use compression::{compress, decompress};
pub(crate) use fs::{
    list_working_tree, normalize_repo_path, read_file, to_fs_path, write_file_atomic,
};
pub(crate) use hash::hash_object;
