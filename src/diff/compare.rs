//! Per-path comparison logic

use crate::types::{DirectoryEntry, Side};
use std::cmp::Ordering;

/// Outcome of comparing one path present on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Same modification time
    Unchanged,
    /// Timestamps differ; the tagged side is strictly newer
    Conflict(Side),
}

/// Compare the remote and local copies of one path
///
/// Modification time is the only change signal. Size and content are not
/// looked at, so two different files with equal timestamps are `Unchanged`
/// and clock skew between the two filesystems shows up as a conflict.
pub fn compare_entries(remote: &DirectoryEntry, local: &DirectoryEntry) -> Classification {
    match remote.mtime.cmp(&local.mtime) {
        Ordering::Equal => Classification::Unchanged,
        Ordering::Greater => Classification::Conflict(Side::Remote),
        Ordering::Less => Classification::Conflict(Side::Local),
    }
}
