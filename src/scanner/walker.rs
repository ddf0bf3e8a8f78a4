//! Sequential directory walker

use crate::types::{DirectoryEntry, FileTree, SyncError};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Scan a category root and build a FileTree
///
/// Walks the directory with the `ignore` crate, with every filter disabled:
/// hidden files, `.gitignore` rules and the like all count as content here.
/// When `recursive` is false only the files directly under `root_path` are
/// listed.
///
/// # Errors
/// * `InaccessibleRoot` if the root is missing, unreadable or not a directory
/// * `Walk` if any directory below the root cannot be listed
/// * `Io` if a file's modification time cannot be read
pub fn scan_directory(root_path: &Path, recursive: bool) -> Result<FileTree, SyncError> {
    let start_time = Instant::now();

    let root_meta = fs::metadata(root_path).map_err(|source| SyncError::InaccessibleRoot {
        path: root_path.to_path_buf(),
        source,
    })?;
    if !root_meta.is_dir() {
        return Err(SyncError::InaccessibleRoot {
            path: root_path.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }

    let mut tree = FileTree::new(root_path.to_path_buf());

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(if recursive { None } else { Some(1) })
        .build();

    for result in walker {
        let entry = result.map_err(|e| SyncError::Walk {
            path: root_path.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.depth() == 0 {
            continue;
        }

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };

        if file_type.is_dir() {
            tree.increment_dirs();
            continue;
        }

        // Symlinks are synced by content, so look through them.
        let metadata = if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => m,
                Ok(_) => {
                    debug!(path = %entry.path().display(), "skipping symlink to directory");
                    continue;
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping broken symlink");
                    continue;
                }
            }
        } else if file_type.is_file() {
            entry.metadata().map_err(|e| SyncError::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            // pipes, sockets, devices
            continue;
        };

        let relative_path = match entry.path().strip_prefix(root_path) {
            Ok(p) => p.to_path_buf(),
            Err(_) => {
                warn!(path = %entry.path().display(), "entry outside scan root, skipping");
                continue;
            }
        };

        let mtime = metadata.modified().map_err(|e| {
            SyncError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to get modification time for {}: {}",
                    entry.path().display(),
                    e
                ),
            ))
        })?;

        let file_entry = DirectoryEntry::new(relative_path, metadata.len(), mtime);
        if let Some(previous) = tree.insert(file_entry) {
            warn!(
                root = %root_path.display(),
                path = %previous.path.display(),
                "paths differ only by case; keeping the last one seen"
            );
        }
    }

    tree.set_scan_duration(start_time.elapsed());
    debug!(
        root = %root_path.display(),
        files = tree.total_files,
        dirs = tree.total_dirs,
        elapsed_ms = tree.scan_duration.as_millis() as u64,
        "scan complete"
    );

    Ok(tree)
}
