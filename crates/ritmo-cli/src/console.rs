//! Terminal delivery of notifications and day summaries.

use ritmo_core::{DaySummary, Notification, NotificationSink, Severity, SummaryPresenter};

/// Prints notifications and summaries to stderr, keeping stdout for JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn emit(&self, n: Notification) {
        let tag = match n.severity {
            Severity::Success => "done",
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "alert",
        };
        eprintln!("[{tag}] {}: {}", n.title, n.message);
    }
}

impl SummaryPresenter for ConsoleNotifier {
    fn show_day_summary(&self, summary: &DaySummary) {
        eprintln!("Day summary for {}", summary.date);
        eprintln!("  study time:   {}", summary.formatted_study_time());
        eprintln!(
            "  tasks:        {}/{} ({}%)",
            summary.completed_task_count,
            summary.total_task_count,
            summary.daily_progress_pct()
        );
        eprintln!("  productivity: {}", summary.productivity_score);
        for entry in &summary.entries {
            let secs = entry.seconds_spent;
            eprintln!(
                "  - {} [{}] {}m {:02}s",
                entry.task_name,
                entry.mode,
                secs / 60,
                secs % 60
            );
        }
    }
}
