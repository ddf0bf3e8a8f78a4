//! Progress reporting

use crate::commands::{CategoryReport, SyncEvent};
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Terminal renderer for sync events
pub struct ProgressReporter {
    bar: ProgressBar,
    quiet: bool,
    started_at: Instant,
    transfers: u64,
}

impl ProgressReporter {
    /// Create a new progress reporter; `quiet` hides everything
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(120));
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar
        };

        Self {
            bar,
            quiet,
            started_at: Instant::now(),
            transfers: 0,
        }
    }

    /// Print a line to stdout above the spinner
    pub fn println(&self, line: impl AsRef<str>) {
        if !self.quiet {
            self.bar.suspend(|| println!("{}", line.as_ref()));
        }
    }

    /// Render one event
    pub fn handle(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::CategoryStart { .. } => {
                self.println(style(event.to_string()).bold().to_string());
                self.bar.set_message(event.to_string());
            }
            SyncEvent::Transfer { .. } => {
                self.transfers += 1;
                self.println(format!("  {event}"));
                self.bar.set_message(event.to_string());
            }
            SyncEvent::Skipped { .. } => {
                self.bar.set_message(event.to_string());
            }
            SyncEvent::CategoryComplete { report } => {
                self.println(format!("  {}", style(report).dim()));
            }
        }
    }

    /// Clear the spinner and print the closing line
    pub fn finish(&self, reports: &[CategoryReport]) {
        let bytes: u64 = reports.iter().map(|report| report.bytes_copied).sum();
        let dry_run = reports.iter().any(|report| report.dry_run);

        self.bar.finish_and_clear();
        self.println("");
        if dry_run {
            self.println("Dry-run mode: no changes were made.");
        }
        self.println(format!(
            "{} {} files | {} | {:.1?}",
            style("Sync complete!").green().bold(),
            self.transfers,
            HumanBytes(bytes),
            self.started_at.elapsed()
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
