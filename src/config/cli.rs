//! Command-line arguments

use crate::types::{Category, SyncDirection};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Two-way ProPresenter library synchronization
///
/// Keeps this machine's library, templates, media and playlists in step with
/// a shared sync folder, resolving conflicts by modification time.
#[derive(Parser, Debug, Default)]
#[command(name = "prosync")]
#[command(about, long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Read settings from a TOML file (flags still win)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root of the shared sync folder
    #[arg(short, long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Local library (documents) folder
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Local templates folder
    #[arg(long, value_name = "PATH")]
    pub templates: Option<PathBuf>,

    /// Local media folder
    #[arg(long, value_name = "PATH")]
    pub media: Option<PathBuf>,

    /// Local playlist data folder
    #[arg(long, value_name = "PATH")]
    pub playlists: Option<PathBuf>,

    /// Library path as written into received playlists
    /// (default: the local library folder)
    #[arg(long, value_name = "PATH")]
    pub library_reference: Option<String>,

    /// Only receive from the sync folder
    #[arg(long, conflicts_with_all = ["both", "up"])]
    pub down: bool,

    /// Receive and upload (default)
    #[arg(long, conflicts_with_all = ["down", "up"])]
    pub both: bool,

    /// Only upload to the sync folder
    #[arg(long, conflicts_with_all = ["down", "both"])]
    pub up: bool,

    /// Overwrite the older side of a conflicting file
    #[arg(long, overrides_with = "no_replace")]
    pub replace: bool,

    /// Leave conflicting files alone (playlists are still resolved)
    #[arg(long, overrides_with = "replace")]
    pub no_replace: bool,

    /// Sync the library (default)
    #[arg(long, overrides_with = "no_sync_library")]
    pub sync_library: bool,
    /// Skip the library
    #[arg(long, overrides_with = "sync_library")]
    pub no_sync_library: bool,

    /// Sync templates (default)
    #[arg(long, overrides_with = "no_sync_templates")]
    pub sync_templates: bool,
    /// Skip templates
    #[arg(long, overrides_with = "sync_templates")]
    pub no_sync_templates: bool,

    /// Sync media (default)
    #[arg(long, overrides_with = "no_sync_media")]
    pub sync_media: bool,
    /// Skip media
    #[arg(long, overrides_with = "sync_media")]
    pub no_sync_media: bool,

    /// Sync playlists (default)
    #[arg(long, overrides_with = "no_sync_playlists")]
    pub sync_playlists: bool,
    /// Skip playlists
    #[arg(long, overrides_with = "sync_playlists")]
    pub no_sync_playlists: bool,

    /// Show what would be transferred without touching either side
    #[arg(long)]
    pub dry_run: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Direction chosen on the command line, if any
    pub fn direction(&self) -> Option<SyncDirection> {
        if self.down {
            Some(SyncDirection::Down)
        } else if self.up {
            Some(SyncDirection::Up)
        } else if self.both {
            Some(SyncDirection::Both)
        } else {
            None
        }
    }

    pub fn replace(&self) -> Option<bool> {
        switch(self.replace, self.no_replace)
    }

    /// Explicit enable/disable for one category
    pub fn category_switch(&self, category: Category) -> Option<bool> {
        match category {
            Category::Library => switch(self.sync_library, self.no_sync_library),
            Category::Templates => switch(self.sync_templates, self.no_sync_templates),
            Category::Media => switch(self.sync_media, self.no_sync_media),
            Category::Playlists => switch(self.sync_playlists, self.no_sync_playlists),
        }
    }

    pub fn local_root(&self, category: Category) -> Option<&PathBuf> {
        match category {
            Category::Library => self.library.as_ref(),
            Category::Templates => self.templates.as_ref(),
            Category::Media => self.media.as_ref(),
            Category::Playlists => self.playlists.as_ref(),
        }
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
