// crates/catalog-sync-core/src/staging.rs
// ============================================================================
// Module: Staged Writes
// Description: Temp-file staging with a rename-only commit phase.
// Purpose: Make catalog and artifact writes one logical transaction.
// Dependencies: cap-primitives, cap-std, tracing
// ============================================================================

//! ## Overview
//! [`StagedWrites`] prepares every output as a fully written, `fsync`ed
//! temporary sibling of its target (`.tmp-{name}.{pid}.{attempt}`, created
//! with `create_new` and without following symlinks). Only once every output
//! is staged does [`StagedWrites::commit`] rename the temporaries over their
//! targets. Dropping an uncommitted set removes its temporaries, so an abort
//! before commit leaves every target untouched.

use std::ffi::OsStr;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;
use tracing::debug;
use tracing::warn;

use crate::SyncError;
use crate::fsutil::map_open_error;
use crate::fsutil::open_parent_dir;

/// Attempts made to allocate a unique temporary name per target.
const TEMP_ATTEMPTS: u32 = 64;

/// One staged output awaiting commit.
#[derive(Debug)]
struct StagedFile {
    /// Directory holding both the temporary and the target.
    parent: Dir,
    /// Target file name within `parent`.
    file_name: OsString,
    /// Temporary file name within `parent`.
    temp_name: PathBuf,
    /// Target path relative to the root.
    path: PathBuf,
    /// Set once the temporary has been renamed over the target.
    committed: bool,
}

/// Set of outputs staged under one root.
///
/// # Invariants
/// - Each target path is staged at most once.
/// - Before [`StagedWrites::commit`] no target has been modified.
#[derive(Debug)]
pub struct StagedWrites {
    /// Root every staged path is relative to.
    root: Dir,
    /// Staged outputs in staging order.
    files: Vec<StagedFile>,
}

impl StagedWrites {
    /// Creates an empty staging set for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] when the root handle cannot be duplicated.
    pub fn new(root: &Dir) -> Result<Self, SyncError> {
        let root = root.try_clone().map_err(|err| SyncError::Io {
            path: PathBuf::from("."),
            message: err.to_string(),
        })?;
        Ok(Self {
            root,
            files: Vec::new(),
        })
    }

    /// Writes `bytes` to a temporary sibling of `relative`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnsafePath`] for symlinked or escaping paths and
    /// [`SyncError::Commit`] when the path is already staged or the temporary
    /// cannot be written.
    pub fn stage(&mut self, relative: &Path, bytes: &[u8]) -> Result<(), SyncError> {
        let (parent, file_name, path) = open_parent_dir(&self.root, relative, true)?;
        if self.files.iter().any(|file| file.path == path) {
            return Err(SyncError::Commit {
                path,
                message: "path staged twice".to_string(),
            });
        }
        let temp_name = write_temp(&parent, &file_name, &path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "staged write");
        self.files.push(StagedFile {
            parent,
            file_name,
            temp_name,
            path,
            committed: false,
        });
        Ok(())
    }

    /// Number of staged outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Renames every temporary over its target, in staging order.
    ///
    /// Returns the committed target paths.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Commit`] when a rename fails; remaining
    /// temporaries are removed.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, SyncError> {
        let mut committed = Vec::with_capacity(self.files.len());
        for file in &mut self.files {
            file.parent
                .rename(&file.temp_name, &file.parent, Path::new(&file.file_name))
                .map_err(|err| SyncError::Commit {
                    path: file.path.clone(),
                    message: err.to_string(),
                })?;
            file.committed = true;
            debug!(path = %file.path.display(), "committed write");
            committed.push(file.path.clone());
        }
        Ok(committed)
    }
}

impl Drop for StagedWrites {
    fn drop(&mut self) {
        for file in self.files.iter().filter(|file| !file.committed) {
            if let Err(err) = file.parent.remove_file(&file.temp_name) {
                warn!(
                    path = %file.path.display(),
                    error = %err,
                    "failed to remove staged temporary"
                );
            }
        }
    }
}

/// Creates, fills, and syncs a unique temporary sibling of `file_name`.
fn write_temp(
    parent: &Dir,
    file_name: &OsStr,
    path: &Path,
    bytes: &[u8],
) -> Result<PathBuf, SyncError> {
    let commit_error = |message: String| SyncError::Commit {
        path: path.to_path_buf(),
        message,
    };
    for attempt in 0 .. TEMP_ATTEMPTS {
        let temp_name = temp_file_name(file_name, attempt);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        match parent.open_with(&temp_name, &options) {
            Ok(mut temp_file) => {
                if let Err(err) = temp_file.write_all(bytes).and_then(|()| temp_file.sync_all()) {
                    let _ = parent.remove_file(&temp_name);
                    return Err(commit_error(err.to_string()));
                }
                return Ok(temp_name);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(map_open_error(&err, path)),
        }
    }
    Err(commit_error("unable to allocate temporary output file".to_string()))
}

/// Builds a deterministic temporary file name for a staged write.
fn temp_file_name(file_name: &OsStr, attempt: u32) -> PathBuf {
    let mut temp = OsString::from(".tmp-");
    temp.push(file_name);
    temp.push(format!(".{}.{}", std::process::id(), attempt));
    PathBuf::from(temp)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
