//! Tree comparison: partition two file trees into new/missing/conflict/unchanged

use crate::diff::compare::{compare_entries, Classification};
use crate::scanner::scan_directory;
use crate::types::{DirectoryEntry, FileTree, Side, SyncError};
use std::path::{Path, PathBuf};

/// A path present on both sides with differing timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub remote: DirectoryEntry,
    pub local: DirectoryEntry,
    /// Side with the strictly greater modification time
    pub newer: Side,
}

impl Conflict {
    /// Relative path in the spelling of the given side
    pub fn path(&self, side: Side) -> &PathBuf {
        match side {
            Side::Remote => &self.remote.path,
            Side::Local => &self.local.path,
        }
    }
}

/// Partition of every path seen under remote ∪ local.
///
/// Each normalized path lands in exactly one bucket. Buckets are sorted by
/// normalized path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    /// Exists on remote only
    pub new: Vec<DirectoryEntry>,

    /// Exists on local only
    pub missing: Vec<DirectoryEntry>,

    /// Exists on both with different timestamps
    pub conflicts: Vec<Conflict>,

    /// Exists on both with equal timestamps (remote spelling)
    pub unchanged: Vec<PathBuf>,
}

impl ComparisonResult {
    /// True when nothing would be transferred
    pub fn is_converged(&self) -> bool {
        self.new.is_empty() && self.missing.is_empty() && self.conflicts.is_empty()
    }

    /// Number of actionable paths
    pub fn change_count(&self) -> usize {
        self.new.len() + self.missing.len() + self.conflicts.len()
    }

    /// Number of distinct paths across all four buckets
    pub fn total_paths(&self) -> usize {
        self.change_count() + self.unchanged.len()
    }
}

/// Compare two scanned trees.
///
/// Always called as `compare_trees(remote, local)`: `new` then means
/// remote-only and `missing` local-only.
pub fn compare_trees(remote: &FileTree, local: &FileTree) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    let mut remote_keys: Vec<&String> = remote.keys().collect();
    remote_keys.sort();

    for key in remote_keys {
        let remote_entry = &remote.entries[key];
        match local.get(key) {
            None => result.new.push(remote_entry.clone()),
            Some(local_entry) => match compare_entries(remote_entry, local_entry) {
                Classification::Unchanged => result.unchanged.push(remote_entry.path.clone()),
                Classification::Conflict(newer) => result.conflicts.push(Conflict {
                    remote: remote_entry.clone(),
                    local: local_entry.clone(),
                    newer,
                }),
            },
        }
    }

    let mut local_only: Vec<(&String, &DirectoryEntry)> = local
        .iter()
        .filter(|(key, _)| !remote.contains(key))
        .collect();
    local_only.sort_by(|a, b| a.0.cmp(b.0));
    result
        .missing
        .extend(local_only.into_iter().map(|(_, entry)| entry.clone()));

    result
}

/// Scan both roots and compare them.
///
/// Both roots must already exist; a missing root is reported as
/// `InaccessibleRoot` by the scanner.
pub fn compare_directories(
    remote_root: &Path,
    local_root: &Path,
    recursive: bool,
) -> Result<ComparisonResult, SyncError> {
    let remote = scan_directory(remote_root, recursive)?;
    let local = scan_directory(local_root, recursive)?;
    Ok(compare_trees(&remote, &local))
}
