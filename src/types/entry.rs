//! DirectoryEntry - a single file seen under a category root

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// A file under a sync root, as seen on one side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Relative path from the category root, in the side's own spelling
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,
}

impl DirectoryEntry {
    pub fn new(path: PathBuf, size: u64, mtime: SystemTime) -> Self {
        Self { path, size, mtime }
    }

    /// Comparison key shared by both trees.
    ///
    /// Components are joined with `/` and lowercased, so `Songs\Amazing.pro6`
    /// and `songs/amazing.pro6` meet on the same key.
    pub fn key(&self) -> String {
        normalize_key(&self.path)
    }
}

/// Case- and separator-normalized form of a relative path.
pub fn normalize_key(path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                // A relative path produced on another platform may still carry
                // backslashes inside a single component.
                for piece in part.to_string_lossy().split('\\') {
                    if !piece.is_empty() {
                        segments.push(piece.to_lowercase());
                    }
                }
            }
            Component::ParentDir => segments.push("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments.join("/")
}
