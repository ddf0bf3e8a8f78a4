//! FileTree - snapshot of one category root

use super::DirectoryEntry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// File tree (one side of a comparison)
#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    /// Map: normalized key → DirectoryEntry
    pub entries: HashMap<String, DirectoryEntry>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,
    pub total_dirs: usize,

    /// Scan metadata
    pub scan_duration: Duration,
    pub root_path: PathBuf,
}

impl FileTree {
    /// Create a new empty FileTree
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: HashMap::new(),
            total_size: 0,
            total_files: 0,
            total_dirs: 0,
            scan_duration: Duration::from_secs(0),
            root_path,
        }
    }

    /// Insert an entry under its normalized key
    ///
    /// Returns the entry previously stored under the same key. Two paths that
    /// differ only by case collapse onto one key; the later one replaces the
    /// earlier and statistics are adjusted.
    pub fn insert(&mut self, entry: DirectoryEntry) -> Option<DirectoryEntry> {
        let key = entry.key();
        self.total_size += entry.size;
        self.total_files += 1;

        let previous = self.entries.insert(key, entry);
        if let Some(old) = &previous {
            self.total_size = self.total_size.saturating_sub(old.size);
            self.total_files = self.total_files.saturating_sub(1);
        }
        previous
    }

    /// Get an entry by normalized key
    pub fn get(&self, key: &str) -> Option<&DirectoryEntry> {
        self.entries.get(key)
    }

    /// Check if a normalized key exists in the tree
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over (key, entry) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DirectoryEntry)> {
        self.entries.iter()
    }

    /// Iterator over the normalized keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Called during scanning for every directory traversed below the root
    pub fn increment_dirs(&mut self) {
        self.total_dirs += 1;
    }
}
