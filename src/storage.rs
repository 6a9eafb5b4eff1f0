//! File primitives shared by every registry mutation
//!
//! Every write ([`atomic_write`], [`safe_copy`]) lands in a sibling temp file
//! first and is renamed into place, so readers see either the old file or the
//! complete new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("source file does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("failed to {op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Existence probe; says nothing about readability
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Create `dir` and its parents; succeeds if it already exists
pub fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|e| StorageError::io("create directory", dir, e))
}

/// Read a whole file, reporting a missing file as [`StorageError::SourceNotFound`]
pub fn read(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StorageError::SourceNotFound(path.to_path_buf()),
        _ => StorageError::io("read", path, e),
    })
}

/// Write `data` to `path` via temp file + rename
///
/// An existing file keeps its permissions, and a symlink keeps pointing at
/// the file it names; the link target is what gets replaced.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let path = resolve_link(path);
    let permissions = fs::metadata(&path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.permissions());
    replace_file(&path, data, permissions)
}

/// Copy `src` onto `dst` using an atomic replace
///
/// The copy is never readable by more users than `src` or an existing `dst`.
pub fn safe_copy(src: &Path, dst: &Path) -> Result<(), StorageError> {
    if !file_exists(src) {
        return Err(StorageError::SourceNotFound(src.to_path_buf()));
    }
    let data = read(src)?;
    let src_meta = fs::metadata(src).map_err(|e| StorageError::io("stat", src, e))?;

    let dst = resolve_link(dst);
    let dst_meta = fs::metadata(&dst).ok().filter(|m| m.is_file());
    replace_file(&dst, &data, Some(merged_permissions(&src_meta, dst_meta.as_ref())))
}

fn replace_file(
    path: &Path,
    data: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_dir(dir)?;
    }

    let tmp_path = temp_sibling(path);
    if let Err(err) = write_and_sync(&tmp_path, data, permissions) {
        discard_temp(&tmp_path);
        return Err(err);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        discard_temp(&tmp_path);
        return Err(StorageError::io("rename temporary file onto", path, e));
    }

    debug!(path = %path.display(), bytes = data.len(), "Wrote file atomically");
    Ok(())
}

/// Follow a symlink to the file it names; dangling links are replaced as-is
fn resolve_link(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    if is_link {
        if let Ok(resolved) = fs::canonicalize(path) {
            return resolved;
        }
    }
    path.to_path_buf()
}

#[cfg(unix)]
fn merged_permissions(src: &fs::Metadata, dst: Option<&fs::Metadata>) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    let src_mode = src.permissions().mode();
    let mode = dst.map_or(src_mode, |d| src_mode & d.permissions().mode());
    fs::Permissions::from_mode(mode & 0o7777)
}

#[cfg(not(unix))]
fn merged_permissions(src: &fs::Metadata, dst: Option<&fs::Metadata>) -> fs::Permissions {
    dst.unwrap_or(src).permissions()
}

/// Delete a file. Returns `false` if it was already gone.
pub fn remove_if_exists(path: &Path) -> Result<bool, StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::io("remove", path, e)),
    }
}

pub fn file_size(path: &Path) -> Result<u64, StorageError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| StorageError::io("stat", path, e))
}

fn write_and_sync(
    tmp_path: &Path,
    data: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<(), StorageError> {
    let mut file =
        fs::File::create(tmp_path).map_err(|e| StorageError::io("create temporary file", tmp_path, e))?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)
            .map_err(|e| StorageError::io("set permissions on temporary file", tmp_path, e))?;
    }
    file.write_all(data)
        .map_err(|e| StorageError::io("write temporary file", tmp_path, e))?;
    file.sync_all()
        .map_err(|e| StorageError::io("sync temporary file", tmp_path, e))
}

fn discard_temp(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %tmp_path.display(), error = %e, "Failed to clean up temporary file");
        }
    }
}

/// Unique hidden name next to `path` so the rename stays on one filesystem
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().simple();
    path.with_file_name(format!(".{name}.{suffix}.tmp"))
}
