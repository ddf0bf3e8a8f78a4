//! SyncAction - Transfers decided by the policy engine

use std::path::PathBuf;

/// A single planned step for one file.
///
/// `source` and `dest` are relative to the sending and receiving category
/// roots. They only differ in spelling when the two sides disagree on case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Plain copy remote → local
    Receive {
        source: PathBuf,
        dest: PathBuf,
        overwrite: bool,
    },

    /// Plain copy local → remote
    Upload {
        source: PathBuf,
        dest: PathBuf,
        overwrite: bool,
    },

    /// Playlist copy remote → local with embedded references rewritten
    Localize { source: PathBuf, dest: PathBuf },

    /// Nothing to do for this path
    Skip { path: PathBuf, reason: SkipReason },
}

/// Why a path was not transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The transfer would flow against the configured direction
    Direction,

    /// Conflict left for manual resolution (replace disabled)
    Conflict,
}

impl SyncAction {
    /// Short label used in progress output
    pub fn action_name(&self) -> &'static str {
        match self {
            SyncAction::Receive { .. } | SyncAction::Localize { .. } => "Receiving",
            SyncAction::Upload { .. } => "Uploading",
            SyncAction::Skip { .. } => "Skipping",
        }
    }

    /// Path shown to the user (the sending side's spelling)
    pub fn path(&self) -> &PathBuf {
        match self {
            SyncAction::Receive { source, .. }
            | SyncAction::Upload { source, .. }
            | SyncAction::Localize { source, .. } => source,
            SyncAction::Skip { path, .. } => path,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SyncAction::Skip { .. })
    }
}
