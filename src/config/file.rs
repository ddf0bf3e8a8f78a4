//! TOML configuration file
//!
//! Every field is optional; anything left out falls back to the built-in
//! default and anything given on the command line overrides it.
//!
//! ```toml
//! source = "//server/ProPresenter Sync"
//! direction = "UpdateBoth"
//! replace = true
//!
//! [local]
//! library = "C:/Users/me/Documents/ProPresenter6"
//! playlists = "C:/Users/me/AppData/Roaming/RenewedVision/ProPresenter6/PlaylistData"
//!
//! [sync]
//! media = false
//! ```

use crate::types::{Category, SyncDirection, SyncError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub library_reference: Option<String>,
    pub direction: Option<SyncDirection>,
    pub replace: Option<bool>,
    pub local: LocalSection,
    pub sync: SyncSection,
}

/// `[local]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalSection {
    pub library: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub media: Option<PathBuf>,
    pub playlists: Option<PathBuf>,
}

/// `[sync]` table: per-category switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSection {
    pub library: Option<bool>,
    pub templates: Option<bool>,
    pub media: Option<bool>,
    pub playlists: Option<bool>,
}

impl ConfigFile {
    /// Load and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::parse(&text)
            .map_err(|e| SyncError::Config(format!("invalid config file {}: {e}", path.display())))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn local_root(&self, category: Category) -> Option<&PathBuf> {
        match category {
            Category::Library => self.local.library.as_ref(),
            Category::Templates => self.local.templates.as_ref(),
            Category::Media => self.local.media.as_ref(),
            Category::Playlists => self.local.playlists.as_ref(),
        }
    }

    pub fn category_switch(&self, category: Category) -> Option<bool> {
        match category {
            Category::Library => self.sync.library,
            Category::Templates => self.sync.templates,
            Category::Media => self.sync.media,
            Category::Playlists => self.sync.playlists,
        }
    }
}
