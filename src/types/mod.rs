//! Core type definitions for prosync

mod action;
mod entry;
mod error;
mod policy;
mod tree;

pub use action::{SkipReason, SyncAction};
pub use entry::{normalize_key, DirectoryEntry};
pub use error::SyncError;
pub use policy::{Category, CategoryRoots, Side, SyncDirection, SyncPolicy};
pub use tree::FileTree;
