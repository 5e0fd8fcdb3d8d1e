//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::errors::{PreconditionProblem, SetupError};

/// Remove whatever is at `path`, like `rm -rf`.
///
/// Directories are removed recursively. Files and symlinks are unlinked;
/// a symlink to a directory is not followed. Returns `true` if something
/// was removed.
pub fn remove_path_if_exists(path: &Path) -> io::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Ensure a directory exists, creating it and its parents if necessary.
///
/// Returns `true` if the directory had to be created.
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

/// Require `path` to be an existing regular file.
pub fn validate_file(path: &Path) -> Result<(), SetupError> {
    if !path.exists() {
        return Err(SetupError::Precondition {
            path: path.to_path_buf(),
            problem: PreconditionProblem::NotFound,
        });
    }
    if !path.is_file() {
        return Err(SetupError::Precondition {
            path: path.to_path_buf(),
            problem: PreconditionProblem::NotAFile,
        });
    }
    Ok(())
}

/// Require `path` to be an existing directory.
pub fn validate_dir(path: &Path) -> Result<(), SetupError> {
    if !path.exists() {
        return Err(SetupError::Precondition {
            path: path.to_path_buf(),
            problem: PreconditionProblem::NotFound,
        });
    }
    if !path.is_dir() {
        return Err(SetupError::Precondition {
            path: path.to_path_buf(),
            problem: PreconditionProblem::NotADirectory,
        });
    }
    Ok(())
}

/// Make `path` absolute against `base`, dropping `.` components.
///
/// This is purely lexical: symlinks are not resolved and `..` is kept.
pub fn absolute_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Resolve `.` and `..` components of an absolute path without touching
/// the filesystem. `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
