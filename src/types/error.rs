//! Error types for prosync

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for prosync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A category root could not be created or listed
    #[error("Inaccessible root {path}: {source}")]
    InaccessibleRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed below a root
    #[error("Failed to list {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Destination volume ran out of space
    #[error("Disk full while writing {path}")]
    DiskFull { path: PathBuf },

    /// Playlist document could not be parsed or lacks required structure
    #[error("Malformed playlist {path}: {reason}")]
    MalformedPlaylist { path: PathBuf, reason: String },

    /// Copy succeeded but the source timestamps could not be applied
    #[error("Failed to mirror timestamps onto {path}: {source}")]
    TimestampMirror {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Build a `MalformedPlaylist` error from any displayable cause
    pub fn malformed(path: &Path, reason: impl std::fmt::Display) -> Self {
        SyncError::MalformedPlaylist {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Classify an IO error raised while writing `path`
    pub fn from_write(path: &Path, error: std::io::Error) -> Self {
        if matches!(error.kind(), ErrorKind::PermissionDenied) {
            SyncError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else if matches!(error.kind(), ErrorKind::StorageFull)
            || error.raw_os_error().is_some_and(is_out_of_space_code)
        {
            SyncError::DiskFull {
                path: path.to_path_buf(),
            }
        } else {
            SyncError::Io(error)
        }
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        matches!(self, SyncError::PermissionDenied { .. })
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, SyncError::DiskFull { .. })
    }

    /// Check if this error came from reading a playlist document
    pub fn is_playlist_error(&self) -> bool {
        matches!(self, SyncError::MalformedPlaylist { .. })
    }
}

/// ENOSPC
#[cfg(unix)]
fn is_out_of_space_code(code: i32) -> bool {
    code == 28
}

/// ERROR_HANDLE_DISK_FULL and ERROR_DISK_FULL
#[cfg(windows)]
fn is_out_of_space_code(code: i32) -> bool {
    matches!(code, 39 | 112)
}

#[cfg(not(any(unix, windows)))]
fn is_out_of_space_code(_code: i32) -> bool {
    false
}
