//! Point received playlists at this machine's library

use super::document::rewrite_cue_paths;
use crate::executor::{mirror_timestamps, part_path};
use crate::types::SyncError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Separator between path segments inside an escaped `filePath`
const ESCAPED_SEPARATOR: &str = "%5c";

/// Build the localized reference for one cue.
///
/// Only the final segment of the original reference survives; it is appended
/// to the escaped library reference as is. The reference is expected to end
/// in a separator.
pub fn localized_reference(original: &str, library_reference: &str) -> String {
    let lowered = original.to_ascii_lowercase();
    let last_segment = match lowered.rfind(ESCAPED_SEPARATOR) {
        Some(idx) => &original[idx + ESCAPED_SEPARATOR.len()..],
        None => original,
    };
    format!("{}{}", urlencoding::encode(library_reference), last_segment)
}

/// Write a localized copy of the playlist at `incoming` to `dest`.
///
/// The document is rewritten in memory first, so a malformed playlist fails
/// without touching `dest`. The result is written to a temporary file, given
/// `incoming`'s timestamps, and only then renamed into place. Returns the
/// number of bytes written.
pub fn localize(incoming: &Path, dest: &Path, library_reference: &str) -> Result<u64, SyncError> {
    let data = fs::read(incoming)?;
    let (localized, cues) = rewrite_cue_paths(&data, incoming, |original| {
        localized_reference(original, library_reference)
    })?;

    install(&localized, incoming, dest)?;

    debug!(
        source = %incoming.display(),
        dest = %dest.display(),
        cues,
        "playlist localized"
    );

    Ok(localized.len() as u64)
}

/// Replace `dest` with `contents` stamped with `timestamps_from`'s times
fn install(contents: &[u8], timestamps_from: &Path, dest: &Path) -> Result<(), SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::from_write(parent, e))?;
    }

    let part = part_path(dest);
    let result = write_file(&part, contents).and_then(|()| {
        mirror_timestamps(timestamps_from, &part)?;
        fs::rename(&part, dest).map_err(|e| SyncError::from_write(dest, e))
    });
    if let Err(e) = result {
        let _ = fs::remove_file(&part);
        return Err(e);
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SyncError> {
    let mut file = fs::File::create(path).map_err(|e| SyncError::from_write(path, e))?;
    file.write_all(contents)
        .map_err(|e| SyncError::from_write(path, e))?;
    file.sync_all().map_err(|e| SyncError::from_write(path, e))
}
