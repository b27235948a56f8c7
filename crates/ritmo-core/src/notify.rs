//! Outbound signals: user-facing notifications and the day-summary display.
//!
//! Both are fire-and-forget. The engine never waits on, retries, or inspects
//! the result of a delivery.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::DaySummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            at,
        }
    }
}

/// Receives notifications at state transitions and time thresholds.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, notification: Notification);
}

/// Receives the finalized summary when a day is ended.
pub trait SummaryPresenter: Send + Sync {
    fn show_day_summary(&self, summary: &DaySummary);
}

/// Writes every signal to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn emit(&self, n: Notification) {
        match n.severity {
            Severity::Error => tracing::error!(title = %n.title, "{}", n.message),
            Severity::Warning => tracing::warn!(title = %n.title, "{}", n.message),
            Severity::Success | Severity::Info => {
                tracing::info!(title = %n.title, "{}", n.message)
            }
        }
    }
}

impl SummaryPresenter for TracingNotifier {
    fn show_day_summary(&self, summary: &DaySummary) {
        tracing::info!(
            date = %summary.date,
            total_study_seconds = summary.total_study_seconds,
            completed = summary.completed_task_count,
            total = summary.total_task_count,
            productivity = summary.productivity_score,
            "day summary"
        );
    }
}

/// Keeps every signal in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    summaries: Mutex<Vec<DaySummary>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn summaries(&self) -> Vec<DaySummary> {
        self.summaries.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Drain recorded notifications, e.g. after a driver has printed them.
    pub fn take_notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    pub fn take_summaries(&self) -> Vec<DaySummary> {
        self.summaries
            .lock()
            .map(|mut s| std::mem::take(&mut *s))
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingNotifier {
    fn emit(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }
}

impl SummaryPresenter for RecordingNotifier {
    fn show_day_summary(&self, summary: &DaySummary) {
        if let Ok(mut s) = self.summaries.lock() {
            s.push(summary.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn recording_notifier_keeps_order_and_drains() {
        let sink = RecordingNotifier::new();
        let now = Utc::now();
        sink.emit(Notification::new("a", "first", Severity::Info, now));
        sink.emit(Notification::new("b", "second", Severity::Error, now));

        assert_eq!(sink.titles(), vec!["a", "b"]);
        assert_eq!(sink.count_severity(Severity::Error), 1);
        assert_eq!(sink.take_notifications().len(), 2);
        assert!(sink.notifications().is_empty());
    }
}
