// crates/catalog-sync-core/src/fsutil.rs
// ============================================================================
// Module: Filesystem Helpers
// Description: No-follow directory traversal and bounded reads under a root.
// Purpose: Keep every catalog and artifact access inside the project root.
// Dependencies: cap-primitives, cap-std
// ============================================================================

//! ## Overview
//! All paths handled by the engine are relative to a project root opened as a
//! capability [`Dir`]. Directory components are opened one at a time without
//! following symlinks, and files are opened with `O_NOFOLLOW` semantics, so a
//! symlink anywhere on the path surfaces as [`SyncError::UnsafePath`].

use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;

use crate::SyncError;

// ============================================================================
// SECTION: Roots
// ============================================================================

/// Opens the project root directory.
///
/// # Errors
///
/// Returns [`SyncError::Io`] when the directory cannot be opened.
pub fn open_root(path: &Path) -> Result<Dir, SyncError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| SyncError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Reads a UTF-8 text file below `root`, returning `None` when it is absent.
///
/// # Errors
///
/// Returns [`SyncError::UnsafePath`] for symlinked or escaping paths and
/// [`SyncError::Io`] for read failures, oversized files, or invalid UTF-8.
pub fn read_text_file(root: &Dir, relative: &Path, limit: u64) -> Result<Option<String>, SyncError> {
    let (parent, file_name, _) = match open_parent_dir(root, relative, false) {
        Ok(opened) => opened,
        Err(SyncError::Io {
            message, ..
        }) if message == NOT_FOUND => return Ok(None),
        Err(err) => return Err(err),
    };
    match read_bounded(&parent, Path::new(&file_name), limit) {
        Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| SyncError::Io {
            path: relative.to_path_buf(),
            message: "file is not valid utf-8".to_string(),
        }),
        Err(failure) if failure.is_not_found() => Ok(None),
        Err(failure) => Err(failure.into_sync_error(relative)),
    }
}

// ============================================================================
// SECTION: Directory Traversal
// ============================================================================

/// Message recorded for missing path components.
const NOT_FOUND: &str = "not found";

/// Opens a directory below `root` one component at a time.
pub(crate) fn open_dir(root: &Dir, relative: &Path) -> Result<Dir, SyncError> {
    let mut current = root.try_clone().map_err(|err| io_error(relative, &err))?;
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(name) => {
                current = open_child_dir_nofollow(&current, Path::new(name))
                    .map_err(|err| map_open_error(&err, relative))?;
            }
            _ => return Err(SyncError::UnsafePath(relative.to_path_buf())),
        }
    }
    Ok(current)
}

/// Opens the parent directory of a relative file path.
///
/// Returns the parent handle, the final file name, and the normalized path.
pub(crate) fn open_parent_dir(
    root: &Dir,
    relative: &Path,
    create_missing: bool,
) -> Result<(Dir, OsString, PathBuf), SyncError> {
    let mut current = root.try_clone().map_err(|err| io_error(relative, &err))?;
    let mut normalized = PathBuf::new();
    let mut components =
        relative.components().filter(|component| *component != Component::CurDir).peekable();
    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            return Err(SyncError::UnsafePath(relative.to_path_buf()));
        };
        normalized.push(name);
        if components.peek().is_none() {
            return Ok((current, name.to_os_string(), normalized));
        }
        current = open_or_create_child_dir_nofollow(&current, Path::new(name), create_missing)
            .map_err(|err| map_open_error(&err, relative))?;
    }
    Err(SyncError::UnsafePath(relative.to_path_buf()))
}

/// Opens a child directory without following symlinks.
fn open_child_dir_nofollow(parent: &Dir, child: &Path) -> std::io::Result<Dir> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(child, &options)?;
    let metadata = file.metadata()?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(
            ErrorKind::NotADirectory,
            "path component is not a directory",
        ));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Opens or creates a child directory without following symlinks.
fn open_or_create_child_dir_nofollow(
    parent: &Dir,
    child: &Path,
    create_missing: bool,
) -> std::io::Result<Dir> {
    match open_child_dir_nofollow(parent, child) {
        Ok(dir) => Ok(dir),
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            open_child_dir_nofollow(parent, child)
        }
        Err(err) => Err(err),
    }
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Failure while reading a file with a size bound.
#[derive(Debug)]
pub(crate) enum ReadFailure {
    /// The file could not be opened or read.
    Io(std::io::Error),
    /// The path names something other than a regular file.
    NotFile,
    /// The file exceeds the byte limit.
    TooLarge(u64),
}

impl ReadFailure {
    /// Returns true when the file does not exist.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == ErrorKind::NotFound)
    }

    /// Converts the failure into an engine error for `path`.
    pub(crate) fn into_sync_error(self, path: &Path) -> SyncError {
        match self {
            Self::Io(err) => map_open_error(&err, path),
            Self::NotFile | Self::TooLarge(_) => SyncError::Io {
                path: path.to_path_buf(),
                message: self.to_string(),
            },
        }
    }

    /// Returns true when the failure was caused by a symlink.
    pub(crate) fn is_symlink(&self) -> bool {
        matches!(self, Self::Io(err) if is_symlink_error(err))
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::NotFile => f.write_str("not a regular file"),
            Self::TooLarge(limit) => write!(f, "file exceeds {limit} bytes"),
        }
    }
}

/// Reads at most `limit` bytes of a regular file without following symlinks.
pub(crate) fn read_bounded(parent: &Dir, name: &Path, limit: u64) -> Result<Vec<u8>, ReadFailure> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(name, &options).map_err(ReadFailure::Io)?;
    let metadata = file.metadata().map_err(ReadFailure::Io)?;
    if !metadata.is_file() {
        return Err(ReadFailure::NotFile);
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadFailure::Io)?;
    let size = u64::try_from(bytes.len()).map_err(|_| ReadFailure::TooLarge(limit))?;
    if size > limit {
        return Err(ReadFailure::TooLarge(limit));
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Returns true when an open failed because the final component is a symlink.
pub(crate) fn is_symlink_error(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    if err.raw_os_error() == Some(40) {
        return true;
    }
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(681) | Some(1920)) {
        return true;
    }
    false
}

/// Maps low-level open errors into engine errors.
pub(crate) fn map_open_error(err: &std::io::Error, path: &Path) -> SyncError {
    if is_symlink_error(err) {
        return SyncError::UnsafePath(path.to_path_buf());
    }
    if err.kind() == ErrorKind::NotFound {
        return SyncError::Io {
            path: path.to_path_buf(),
            message: NOT_FOUND.to_string(),
        };
    }
    io_error(path, err)
}

/// Builds a generic IO error for `path`.
pub(crate) fn io_error(path: &Path, err: &std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
