//! Commands exposed by the binary

pub mod sync;

pub use sync::{run, synchronize, CategoryReport, EventCallback, SyncEvent};
