//! Sync plan generation: apply direction and replace policy to a comparison

use crate::diff::{ComparisonResult, Conflict};
use crate::playlist::resolve_winner;
use crate::types::{
    Category, CategoryRoots, DirectoryEntry, Side, SkipReason, SyncAction, SyncError, SyncPolicy,
};
use tracing::debug;

/// Ordered list of actions for one category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub category: Option<Category>,
    pub actions: Vec<SyncAction>,
    pub stats: PlanStats,
}

impl SyncPlan {
    pub fn new(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Add an action to the plan and update statistics
    pub fn add_action(&mut self, action: SyncAction) {
        match &action {
            SyncAction::Receive { .. } => self.stats.receive_count += 1,
            SyncAction::Upload { .. } => self.stats.upload_count += 1,
            SyncAction::Localize { .. } => self.stats.localize_count += 1,
            SyncAction::Skip { reason, .. } => match reason {
                SkipReason::Direction => self.stats.direction_skips += 1,
                SkipReason::Conflict => self.stats.conflict_skips += 1,
            },
        }
        self.actions.push(action);
    }
}

/// Counts per action kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub receive_count: usize,
    pub upload_count: usize,
    pub localize_count: usize,
    pub direction_skips: usize,
    pub conflict_skips: usize,
}

impl PlanStats {
    pub fn transfer_count(&self) -> usize {
        self.receive_count + self.upload_count + self.localize_count
    }
}

/// Decide, per bucket, whether and which way each path moves.
///
/// * `new` entries are received unless the direction is `Up`.
/// * `missing` entries are uploaded unless the direction is `Down`.
/// * conflicts are resolved only when `policy.replace` is set, except for
///   playlists which always resolve. The newer side wins and the transfer is
///   still subject to the direction.
///
/// Playlists are received through localization, and their conflicts are
/// decided by the timestamp embedded in each document rather than by the
/// filesystem, which is why the roots are needed here.
pub fn generate_sync_plan(
    comparison: &ComparisonResult,
    category: Category,
    policy: SyncPolicy,
    roots: &CategoryRoots,
) -> Result<SyncPlan, SyncError> {
    let mut plan = SyncPlan::new(category);

    for entry in &comparison.new {
        plan.add_action(receive_action(entry, category, policy));
    }

    for entry in &comparison.missing {
        plan.add_action(upload_action(entry, policy));
    }

    for conflict in &comparison.conflicts {
        plan.add_action(conflict_action(conflict, category, policy, roots)?);
    }

    debug!(
        category = %category,
        receive = plan.stats.receive_count,
        upload = plan.stats.upload_count,
        localize = plan.stats.localize_count,
        skipped = plan.stats.direction_skips + plan.stats.conflict_skips,
        "plan generated"
    );

    Ok(plan)
}

fn receive_action(entry: &DirectoryEntry, category: Category, policy: SyncPolicy) -> SyncAction {
    if !policy.direction.allows_receive() {
        return SyncAction::Skip {
            path: entry.path.clone(),
            reason: SkipReason::Direction,
        };
    }
    if category.is_playlist() {
        SyncAction::Localize {
            source: entry.path.clone(),
            dest: entry.path.clone(),
        }
    } else {
        SyncAction::Receive {
            source: entry.path.clone(),
            dest: entry.path.clone(),
            overwrite: policy.replace,
        }
    }
}

fn upload_action(entry: &DirectoryEntry, policy: SyncPolicy) -> SyncAction {
    if !policy.direction.allows_upload() {
        return SyncAction::Skip {
            path: entry.path.clone(),
            reason: SkipReason::Direction,
        };
    }
    SyncAction::Upload {
        source: entry.path.clone(),
        dest: entry.path.clone(),
        overwrite: policy.replace,
    }
}

fn conflict_action(
    conflict: &Conflict,
    category: Category,
    policy: SyncPolicy,
    roots: &CategoryRoots,
) -> Result<SyncAction, SyncError> {
    if !policy.replace && !category.always_resolves_conflicts() {
        return Ok(SyncAction::Skip {
            path: conflict.remote.path.clone(),
            reason: SkipReason::Conflict,
        });
    }

    let winner = if category.is_playlist() {
        resolve_winner(
            &roots.remote.join(&conflict.remote.path),
            &roots.local.join(&conflict.local.path),
        )?
    } else {
        conflict.newer
    };

    if !policy.direction.allows_from(winner) {
        return Ok(SyncAction::Skip {
            path: conflict.path(winner).clone(),
            reason: SkipReason::Direction,
        });
    }

    let source = conflict.path(winner).clone();
    Ok(match winner {
        Side::Remote if category.is_playlist() => SyncAction::Localize {
            source,
            dest: conflict.local.path.clone(),
        },
        Side::Remote => SyncAction::Receive {
            source,
            dest: conflict.local.path.clone(),
            overwrite: true,
        },
        Side::Local => SyncAction::Upload {
            source,
            dest: conflict.remote.path.clone(),
            overwrite: true,
        },
    })
}
