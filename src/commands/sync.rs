//! Main sync command

use crate::diff::{compare_trees, generate_sync_plan, PlanStats, SyncPlan};
use crate::executor::{execute_plan, ExecutionEvent};
use crate::scanner::scan_directory;
use crate::types::{
    Category, CategoryRoots, FileTree, SkipReason, SyncAction, SyncError, SyncPolicy,
};
use crate::Config;
use indicatif::HumanBytes;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Notifications emitted while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A category is about to be compared
    CategoryStart { category: Category },

    /// A file is about to be sent (or would be, in a dry run)
    Transfer {
        category: Category,
        action: &'static str,
        path: PathBuf,
        dry_run: bool,
    },

    /// A path was left alone
    Skipped {
        category: Category,
        path: PathBuf,
        reason: SkipReason,
    },

    /// A category finished
    CategoryComplete { report: CategoryReport },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::CategoryStart { category } => write!(f, "Syncing {category}"),
            SyncEvent::Transfer {
                action,
                path,
                dry_run,
                ..
            } => {
                if *dry_run {
                    write!(f, "[dry-run] ")?;
                }
                write!(f, "{} {}", action, path.display())
            }
            SyncEvent::Skipped { path, reason, .. } => {
                let why = match reason {
                    SkipReason::Direction => "direction",
                    SkipReason::Conflict => "conflict, replace disabled",
                };
                write!(f, "Skipping {} ({})", path.display(), why)
            }
            SyncEvent::CategoryComplete { report } => write!(f, "{report}"),
        }
    }
}

/// Optional callback used to receive run notifications.
pub type EventCallback<'a> = dyn Fn(&SyncEvent) + Send + Sync + 'a;

/// Outcome of synchronizing one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub category: Category,
    pub plan: PlanStats,
    pub unchanged: usize,
    pub bytes_copied: u64,
    pub dry_run: bool,
}

impl CategoryReport {
    /// True when the category needed no transfers
    pub fn is_converged(&self) -> bool {
        self.plan.transfer_count() == 0 && self.plan.conflict_skips == 0
    }
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} received, {} uploaded, {} localized, {} conflicts skipped, {} held by direction, {} unchanged | {}",
            self.category,
            self.plan.receive_count,
            self.plan.upload_count,
            self.plan.localize_count,
            self.plan.conflict_skips,
            self.plan.direction_skips,
            self.unchanged,
            HumanBytes(self.bytes_copied)
        )
    }
}

/// Run every enabled category in order: library, templates, media, playlists.
///
/// The first failing category aborts the run; categories already done keep
/// their changes.
pub fn run(
    config: &Config,
    on_event: Option<&EventCallback<'_>>,
) -> Result<Vec<CategoryReport>, SyncError> {
    let library_reference = config.library_reference().unwrap_or_default();
    info!(summary = %format_config_summary(config), "starting sync");

    let mut reports = Vec::new();
    for category in config.categories.enabled() {
        let roots = config.roots(category)?;
        let report = synchronize(
            category,
            &roots,
            config.policy,
            &library_reference,
            config.dry_run,
            on_event,
        )?;
        reports.push(report);
    }

    Ok(reports)
}

/// Synchronize one category's remote and local roots.
///
/// Both roots are created when missing, then compared, planned and executed.
/// In a dry run missing roots are treated as empty, nothing is created and
/// nothing is executed; the planned transfers are still reported.
pub fn synchronize(
    category: Category,
    roots: &CategoryRoots,
    policy: SyncPolicy,
    library_reference: &str,
    dry_run: bool,
    on_event: Option<&EventCallback<'_>>,
) -> Result<CategoryReport, SyncError> {
    emit(on_event, SyncEvent::CategoryStart { category });

    let recursive = category.is_recursive();
    let remote = prepare_and_scan(&roots.remote, recursive, dry_run)?;
    let local = prepare_and_scan(&roots.local, recursive, dry_run)?;

    let comparison = compare_trees(&remote, &local);
    debug!(
        category = %category,
        new = comparison.new.len(),
        missing = comparison.missing.len(),
        conflicts = comparison.conflicts.len(),
        unchanged = comparison.unchanged.len(),
        "compared"
    );

    let plan = generate_sync_plan(&comparison, category, policy, roots)?;

    let bytes_copied = if dry_run {
        for action in &plan.actions {
            emit(on_event, action_event(category, action, true));
        }
        0
    } else {
        execute(category, &plan, roots, library_reference, on_event)?
    };

    let report = CategoryReport {
        category,
        plan: plan.stats,
        unchanged: comparison.unchanged.len(),
        bytes_copied,
        dry_run,
    };
    emit(
        on_event,
        SyncEvent::CategoryComplete {
            report: report.clone(),
        },
    );
    Ok(report)
}

fn execute(
    category: Category,
    plan: &SyncPlan,
    roots: &CategoryRoots,
    library_reference: &str,
    on_event: Option<&EventCallback<'_>>,
) -> Result<u64, SyncError> {
    let bridge = |event: &ExecutionEvent| {
        if let ExecutionEvent::ActionStart { action, .. } = event {
            emit(on_event, action_event(category, action, false));
        }
    };
    let stats = execute_plan(plan, roots, library_reference, Some(&bridge))?;
    debug!(
        category = %category,
        transferred = stats.transferred,
        already_present = stats.already_present,
        skipped = stats.skipped,
        "executed"
    );
    Ok(stats.bytes_copied)
}

fn prepare_and_scan(root: &Path, recursive: bool, dry_run: bool) -> Result<FileTree, SyncError> {
    if dry_run {
        if !root.exists() {
            debug!(root = %root.display(), "dry run: missing root treated as empty");
            return Ok(FileTree::new(root.to_path_buf()));
        }
    } else {
        fs::create_dir_all(root).map_err(|source| SyncError::InaccessibleRoot {
            path: root.to_path_buf(),
            source,
        })?;
    }
    scan_directory(root, recursive)
}

fn action_event(category: Category, action: &SyncAction, dry_run: bool) -> SyncEvent {
    match action {
        SyncAction::Skip { path, reason } => SyncEvent::Skipped {
            category,
            path: path.clone(),
            reason: *reason,
        },
        _ => SyncEvent::Transfer {
            category,
            action: action.action_name(),
            path: action.path().clone(),
            dry_run,
        },
    }
}

fn emit(on_event: Option<&EventCallback<'_>>, event: SyncEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}

/// One-line description of what a run will do
pub fn format_config_summary(config: &Config) -> String {
    let categories: Vec<&str> = config.categories.enabled().map(Category::label).collect();
    format!(
        "Direction: {} | Replace: {} | Categories: {}{}",
        config.policy.direction,
        if config.policy.replace { "yes" } else { "no" },
        categories.join(", "),
        if config.dry_run { " | dry run" } else { "" }
    )
}
