//! Playlist conflict resolution by embedded edit time

use super::document::playlist_modified_date;
use crate::types::{Side, SyncError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Pick the side whose playlist was edited last.
///
/// Filesystem times are not used: a playlist localized on an earlier run
/// carries its source's mtime, not the time it was authored. The remote side
/// wins only when its `modifiedDate` is strictly later, so ties go local.
pub fn resolve_winner(remote: &Path, local: &Path) -> Result<Side, SyncError> {
    let remote_date = read_modified_date(remote)?;
    let local_date = read_modified_date(local)?;

    let winner = if remote_date > local_date {
        Side::Remote
    } else {
        Side::Local
    };

    debug!(
        remote = %remote_date,
        local = %local_date,
        winner = %winner,
        path = %local.display(),
        "playlist conflict resolved"
    );

    Ok(winner)
}

fn read_modified_date(path: &Path) -> Result<chrono::DateTime<chrono::Utc>, SyncError> {
    let data = fs::read(path)?;
    playlist_modified_date(&data, path)
}
