//! Diff engine - Comparison logic and plan generation

mod compare;
mod engine;
mod plan;

pub use compare::{compare_entries, Classification};
pub use engine::{compare_directories, compare_trees, ComparisonResult, Conflict};
pub use plan::{generate_sync_plan, PlanStats, SyncPlan};
