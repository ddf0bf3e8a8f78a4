//! Streaming access to ProPresenter playlist documents
//!
//! Documents are never loaded into a tree. Each pass streams the events from
//! the original bytes and, when rewriting, writes every event back out
//! unchanged except the ones being edited. Whitespace, comments and the
//! declaration are preserved as read.

use crate::types::SyncError;
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Root structural node of a playlist
pub const PLAYLIST_NODE: &[u8] = b"RVPlaylistNode";

/// Cue pointing at a library document
pub const DOCUMENT_CUE: &[u8] = b"RVDocumentCue";

/// Attribute holding the cue's escaped library path
pub const FILE_PATH_ATTR: &str = "filePath";

/// Attribute holding the playlist's authorial edit time
pub const MODIFIED_DATE_ATTR: &str = "modifiedDate";

/// Split a leading UTF-8 byte order mark from the document body
fn split_bom(data: &[u8]) -> (&[u8], &[u8]) {
    if data.starts_with(UTF8_BOM) {
        data.split_at(UTF8_BOM.len())
    } else {
        (&data[..0], data)
    }
}

/// Read the `modifiedDate` of the first `RVPlaylistNode` in the document.
///
/// The whole document is read, so a truncated file is rejected even when the
/// node itself arrived intact.
pub fn playlist_modified_date(data: &[u8], path: &Path) -> Result<DateTime<Utc>, SyncError> {
    let (_, body) = split_bom(data);
    let mut reader = Reader::from_reader(body);
    let mut structure = ElementDepth::default();
    let mut modified = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SyncError::malformed(path, e))?;
        structure.track(&event, path)?;

        match event {
            Event::Start(e) | Event::Empty(e)
                if modified.is_none() && e.name().as_ref() == PLAYLIST_NODE =>
            {
                let raw = attribute_value(&e, MODIFIED_DATE_ATTR, path)?.ok_or_else(|| {
                    SyncError::malformed(path, "RVPlaylistNode has no modifiedDate")
                })?;
                let parsed = parse_modified_date(&raw).ok_or_else(|| {
                    SyncError::malformed(path, format!("bad modifiedDate {raw:?}"))
                })?;
                modified = Some(parsed);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    modified.ok_or_else(|| SyncError::malformed(path, "no RVPlaylistNode element"))
}

/// Element nesting seen so far; catches documents cut off mid-write
#[derive(Debug, Default)]
struct ElementDepth {
    depth: usize,
    roots: usize,
}

impl ElementDepth {
    fn track(&mut self, event: &Event<'_>, path: &Path) -> Result<(), SyncError> {
        match event {
            Event::Start(_) => {
                if self.depth == 0 {
                    self.roots += 1;
                }
                self.depth += 1;
            }
            Event::Empty(_) if self.depth == 0 => self.roots += 1,
            Event::End(_) => self.depth = self.depth.saturating_sub(1),
            Event::Eof if self.depth != 0 || self.roots == 0 => {
                return Err(SyncError::malformed(path, "unexpected end of document"));
            }
            _ => {}
        }
        if self.roots > 1 {
            return Err(SyncError::malformed(path, "more than one root element"));
        }
        Ok(())
    }
}

/// Parse an embedded playlist timestamp.
///
/// Accepts RFC 3339, an ISO 8601 offset without colon, and a bare local
/// timestamp which is taken as UTC.
pub fn parse_modified_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Rewrite the `filePath` of every `RVDocumentCue` through `rewrite`.
///
/// The closure receives the unescaped attribute value and returns the new
/// unescaped value. Returns the new document bytes and the number of cues
/// touched. Nothing is written anywhere; a malformed or truncated document
/// fails before the caller has produced output.
pub fn rewrite_cue_paths<F>(
    data: &[u8],
    path: &Path,
    rewrite: F,
) -> Result<(Vec<u8>, usize), SyncError>
where
    F: Fn(&str) -> String,
{
    let (bom, body) = split_bom(data);
    let mut reader = Reader::from_reader(body);
    let mut writer = Writer::new(Vec::with_capacity(data.len()));
    let mut structure = ElementDepth::default();
    let mut rewritten = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SyncError::malformed(path, e))?;
        structure.track(&event, path)?;

        let event = match event {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == DOCUMENT_CUE => {
                let (cue, changed) = rewrite_cue(&e, path, &rewrite)?;
                rewritten += usize::from(changed);
                Event::Start(cue)
            }
            Event::Empty(e) if e.name().as_ref() == DOCUMENT_CUE => {
                let (cue, changed) = rewrite_cue(&e, path, &rewrite)?;
                rewritten += usize::from(changed);
                Event::Empty(cue)
            }
            other => other,
        };

        writer
            .write_event(event)
            .map_err(|e| SyncError::malformed(path, e))?;
    }

    let mut output = bom.to_vec();
    output.extend_from_slice(&writer.into_inner());
    Ok((output, rewritten))
}

fn rewrite_cue<F>(
    cue: &BytesStart<'_>,
    path: &Path,
    rewrite: &F,
) -> Result<(BytesStart<'static>, bool), SyncError>
where
    F: Fn(&str) -> String,
{
    let name = String::from_utf8_lossy(cue.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    let mut changed = false;

    for attr in cue.attributes() {
        let attr = attr.map_err(|e| SyncError::malformed(path, e))?;
        if attr.key.as_ref() == FILE_PATH_ATTR.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| SyncError::malformed(path, e))?;
            out.push_attribute((FILE_PATH_ATTR, rewrite(&*value).as_str()));
            changed = true;
        } else {
            out.push_attribute(attr);
        }
    }

    Ok((out, changed))
}

fn attribute_value(
    element: &BytesStart<'_>,
    key: &str,
    path: &Path,
) -> Result<Option<String>, SyncError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| SyncError::malformed(path, e))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| SyncError::malformed(path, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
