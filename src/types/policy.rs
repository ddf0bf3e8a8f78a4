//! Sync direction, replace policy and category definitions

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the two trees being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The shared sync folder
    Remote,
    /// This machine's ProPresenter folders
    Local,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Remote => f.write_str("remote"),
            Side::Local => f.write_str("local"),
        }
    }
}

/// Which way files are allowed to flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// Remote → local only
    #[serde(alias = "UpdateClient")]
    Down,

    /// Both ways
    #[default]
    #[serde(alias = "UpdateBoth")]
    Both,

    /// Local → remote only
    #[serde(alias = "UpdateServer")]
    Up,
}

impl SyncDirection {
    /// May files flow from `from` to the other side?
    pub fn allows_from(self, from: Side) -> bool {
        match from {
            Side::Remote => matches!(self, SyncDirection::Down | SyncDirection::Both),
            Side::Local => matches!(self, SyncDirection::Up | SyncDirection::Both),
        }
    }

    pub fn allows_receive(self) -> bool {
        self.allows_from(Side::Remote)
    }

    pub fn allows_upload(self) -> bool {
        self.allows_from(Side::Local)
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::Down => f.write_str("Down"),
            SyncDirection::Both => f.write_str("Both"),
            SyncDirection::Up => f.write_str("Up"),
        }
    }
}

/// Direction plus the replace-on-conflict flag, threaded through planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncPolicy {
    pub direction: SyncDirection,

    /// When false, conflicting files in generic categories are left alone
    pub replace: bool,
}

impl SyncPolicy {
    pub fn new(direction: SyncDirection, replace: bool) -> Self {
        Self { direction, replace }
    }
}

/// A synced content type with its own remote/local root pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Library,
    Templates,
    Media,
    Playlists,
}

impl Category {
    /// Processing order for a run
    pub const ALL: [Category; 4] = [
        Category::Library,
        Category::Templates,
        Category::Media,
        Category::Playlists,
    ];

    /// Playlists live in a flat folder; everything else is a tree.
    pub fn is_recursive(self) -> bool {
        !self.is_playlist()
    }

    pub fn is_playlist(self) -> bool {
        matches!(self, Category::Playlists)
    }

    /// Conflicts are resolved even without the replace flag
    pub fn always_resolves_conflicts(self) -> bool {
        self.is_playlist()
    }

    /// Location of this category inside a ProPresenter sync share
    pub fn remote_root(self, share: &Path) -> PathBuf {
        match self {
            Category::Library => share.join("__Documents").join("Default"),
            Category::Templates => share.join("__Templates"),
            Category::Media => share.join("__Media"),
            Category::Playlists => share.join("__Playlist_Data"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Library => "library",
            Category::Templates => "templates",
            Category::Media => "media",
            Category::Playlists => "playlist",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote and local roots of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRoots {
    pub remote: PathBuf,
    pub local: PathBuf,
}

impl CategoryRoots {
    pub fn new(remote: impl Into<PathBuf>, local: impl Into<PathBuf>) -> Self {
        Self {
            remote: remote.into(),
            local: local.into(),
        }
    }

    pub fn root(&self, side: Side) -> &Path {
        match side {
            Side::Remote => &self.remote,
            Side::Local => &self.local,
        }
    }
}
