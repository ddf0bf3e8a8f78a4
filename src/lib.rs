//! # prosync - ProPresenter library synchronization
//!
//! Two-way sync between this machine's ProPresenter folders and a shared sync
//! folder. Files are matched by case-insensitive relative path and compared
//! by modification time; copies carry their source's timestamps so a second
//! run finds nothing to do. Received playlists are rewritten to point at the
//! local library.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod playlist;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use commands::{run, synchronize, CategoryReport, SyncEvent};
pub use config::Config;
pub use types::{
    Category, CategoryRoots, DirectoryEntry, FileTree, SyncAction, SyncDirection, SyncError,
    SyncPolicy,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
