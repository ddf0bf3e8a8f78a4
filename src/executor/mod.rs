//! Executor module for file operations

mod copy;

pub use copy::{copy_clone, mirror_timestamps, CopyOutcome};
pub(crate) use copy::part_path;

use crate::diff::SyncPlan;
use crate::playlist::localize;
use crate::types::{CategoryRoots, SyncAction, SyncError};
use tracing::{debug, warn};

/// Execution statistics for one plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of actions in the input plan.
    pub total_actions: usize,
    /// Transfers that wrote a destination file.
    pub transferred: usize,
    /// Transfers that found the destination already present.
    pub already_present: usize,
    /// Skip actions passed through.
    pub skipped: usize,
    /// Aggregate bytes written.
    pub bytes_copied: u64,
}

/// Events emitted while executing a plan.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    /// About to perform an action.
    ActionStart {
        index: usize,
        total: usize,
        action: SyncAction,
    },
    /// Action finished.
    ActionSuccess {
        index: usize,
        total: usize,
        action: SyncAction,
        bytes_copied: u64,
    },
    /// Every action in the plan succeeded.
    Complete { stats: ExecutionStats },
}

/// Optional callback used to receive execution events.
pub type ExecutionCallback<'a> = dyn Fn(&ExecutionEvent) + Send + Sync + 'a;

/// Execute a sync plan against one category's roots
///
/// Actions run in plan order. The first failure stops execution and is
/// returned; files already transferred stay in place and the next run picks
/// up the rest.
pub fn execute_plan(
    plan: &SyncPlan,
    roots: &CategoryRoots,
    library_reference: &str,
    on_event: Option<&ExecutionCallback<'_>>,
) -> Result<ExecutionStats, SyncError> {
    let mut stats = ExecutionStats {
        total_actions: plan.actions.len(),
        ..Default::default()
    };

    for (idx, action) in plan.actions.iter().enumerate() {
        let index = idx + 1;
        emit_event(
            on_event,
            ExecutionEvent::ActionStart {
                index,
                total: stats.total_actions,
                action: action.clone(),
            },
        );

        let outcome = execute_action(action, roots, library_reference).map_err(|err| {
            warn!(path = %action.path().display(), error = %err, "transfer failed");
            err
        })?;

        match outcome {
            _ if action.is_skip() => stats.skipped += 1,
            CopyOutcome::Copied(bytes) => {
                stats.transferred += 1;
                stats.bytes_copied += bytes;
            }
            CopyOutcome::AlreadyPresent => {
                debug!(path = %action.path().display(), "destination already present");
                stats.already_present += 1;
            }
        }

        emit_event(
            on_event,
            ExecutionEvent::ActionSuccess {
                index,
                total: stats.total_actions,
                action: action.clone(),
                bytes_copied: outcome.bytes(),
            },
        );
    }

    emit_event(
        on_event,
        ExecutionEvent::Complete {
            stats: stats.clone(),
        },
    );

    Ok(stats)
}

fn execute_action(
    action: &SyncAction,
    roots: &CategoryRoots,
    library_reference: &str,
) -> Result<CopyOutcome, SyncError> {
    match action {
        SyncAction::Receive {
            source,
            dest,
            overwrite,
        } => copy_clone(&roots.remote.join(source), &roots.local.join(dest), *overwrite),
        SyncAction::Upload {
            source,
            dest,
            overwrite,
        } => copy_clone(&roots.local.join(source), &roots.remote.join(dest), *overwrite),
        SyncAction::Localize { source, dest } => localize(
            &roots.remote.join(source),
            &roots.local.join(dest),
            library_reference,
        )
        .map(CopyOutcome::Copied),
        SyncAction::Skip { .. } => Ok(CopyOutcome::AlreadyPresent),
    }
}

fn emit_event(on_event: Option<&ExecutionCallback<'_>>, event: ExecutionEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
