//! Timestamp-preserving atomic file copy

use crate::types::SyncError;
use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Result of a single `copy_clone` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Destination written, with the number of bytes copied
    Copied(u64),
    /// Destination already existed and overwrite was off
    AlreadyPresent,
}

impl CopyOutcome {
    pub fn bytes(self) -> u64 {
        match self {
            CopyOutcome::Copied(bytes) => bytes,
            CopyOutcome::AlreadyPresent => 0,
        }
    }
}

/// Copy `src` to `dest` and make the copy indistinguishable by timestamp.
///
/// 1. Return early if `dest` exists and `overwrite` is false
/// 2. Stream into `<dest>.part` next to the destination, then `sync_all`
/// 3. Copy permissions and mirror access/modification times from `src`
/// 4. Rename over `dest`
///
/// A failure before the rename leaves `dest` as it was. The temporary file is
/// removed on a best-effort basis.
pub fn copy_clone(src: &Path, dest: &Path, overwrite: bool) -> Result<CopyOutcome, SyncError> {
    if !overwrite && dest.exists() {
        return Ok(CopyOutcome::AlreadyPresent);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::from_write(parent, e))?;
    }

    let part_path = part_path(dest);
    let result = write_part(src, &part_path).and_then(|bytes| {
        mirror_timestamps(src, &part_path)?;
        fs::rename(&part_path, dest).map_err(|e| SyncError::from_write(dest, e))?;
        Ok(bytes)
    });

    match result {
        Ok(bytes) => Ok(CopyOutcome::Copied(bytes)),
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(e)
        }
    }
}

/// Set `dest`'s access and modification times to those of `src`.
///
/// Creation time is left alone; it is not settable on every platform.
pub fn mirror_timestamps(src: &Path, dest: &Path) -> Result<(), SyncError> {
    let mirror_err = |source| SyncError::TimestampMirror {
        path: dest.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(src).map_err(mirror_err)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(dest, atime, mtime).map_err(mirror_err)
}

/// Temporary sibling used while a destination is being written
pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

fn write_part(src: &Path, part_path: &Path) -> Result<u64, SyncError> {
    let mut src_file = File::open(src)?;
    let mut part_file = File::create(part_path).map_err(|e| SyncError::from_write(part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file
            .write_all(&buffer[..bytes_read])
            .map_err(|e| SyncError::from_write(part_path, e))?;
        total_bytes += bytes_read as u64;
    }

    part_file
        .sync_all()
        .map_err(|e| SyncError::from_write(part_path, e))?;

    // Windows refuses to rename an open file
    drop(part_file);

    let permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(part_path, permissions)?;

    Ok(total_bytes)
}
