//! Per-day aggregation of completed sessions.
//!
//! A [`DaySummary`] is created lazily for the first session of a date,
//! grows by one [`SummaryEntry`] per finished session and is persisted under
//! `day-summary-<date>` after every change.

mod aggregator;

pub use aggregator::{load_summary, DailyAggregator};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weight of the completion ratio in the productivity score.
pub const COMPLETION_WEIGHT: f64 = 0.7;
/// Weight of time-on-task in the productivity score.
pub const TIME_WEIGHT: f64 = 0.3;
/// Study time that counts as a full day.
pub const REFERENCE_DAY_SECS: u64 = 8 * 3600;

/// One finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub task_id: String,
    pub task_name: String,
    pub mode: String,
    pub seconds_spent: u64,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_study_seconds: u64,
    pub completed_task_count: u32,
    pub total_task_count: u32,
    pub productivity_score: u8,
    #[serde(default)]
    pub entries: Vec<SummaryEntry>,
}

impl DaySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_study_seconds: 0,
            completed_task_count: 0,
            total_task_count: 0,
            productivity_score: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: SummaryEntry) {
        self.total_task_count += 1;
        if entry.completed {
            self.completed_task_count += 1;
        }
        self.total_study_seconds += entry.seconds_spent;
        self.entries.push(entry);
        self.productivity_score = productivity_score(
            self.completed_task_count,
            self.total_task_count,
            self.total_study_seconds,
        );
    }

    /// Completed over total tasks, 0..=100 rounded.
    pub fn daily_progress_pct(&self) -> u8 {
        if self.total_task_count == 0 {
            return 0;
        }
        (f64::from(self.completed_task_count) / f64::from(self.total_task_count) * 100.0).round()
            as u8
    }

    /// `"2h 5m"`
    pub fn formatted_study_time(&self) -> String {
        let hours = self.total_study_seconds / 3600;
        let minutes = (self.total_study_seconds % 3600) / 60;
        format!("{hours}h {minutes}m")
    }
}

/// Blend of completion ratio and time-on-task, 0..=100.
///
/// `round(100 * (0.7 * completed/total + 0.3 * min(study / 8h, 1)))`, and 0
/// when no task has been recorded.
pub fn productivity_score(completed: u32, total: u32, study_secs: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let completion_rate = f64::from(completed) / f64::from(total);
    let time_efficiency = (study_secs as f64 / REFERENCE_DAY_SECS as f64).min(1.0);
    let score = ((completion_rate * COMPLETION_WEIGHT + time_efficiency * TIME_WEIGHT) * 100.0)
        .round();
    score.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(secs: u64, completed: bool) -> SummaryEntry {
        SummaryEntry {
            task_id: "t".into(),
            task_name: "Task".into(),
            mode: "pomodoro".into(),
            seconds_spent: secs,
            completed,
            category: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn score_for_full_completion_and_half_day() {
        assert_eq!(productivity_score(4, 4, 14_400), 85);
    }

    #[test]
    fn score_is_zero_without_tasks() {
        assert_eq!(productivity_score(0, 0, 50_000), 0);
    }

    #[test]
    fn score_caps_time_component_at_reference_day() {
        assert_eq!(productivity_score(1, 1, REFERENCE_DAY_SECS), 100);
        assert_eq!(productivity_score(1, 1, REFERENCE_DAY_SECS * 3), 100);
        assert_eq!(productivity_score(0, 2, REFERENCE_DAY_SECS * 2), 30);
    }

    #[test]
    fn push_keeps_counters_consistent() {
        let mut day = DaySummary::empty(date());
        day.push(entry(1500, true));
        day.push(entry(600, false));
        day.push(entry(1500, true));

        assert_eq!(day.total_task_count, 3);
        assert_eq!(day.completed_task_count, 2);
        assert_eq!(
            day.total_study_seconds,
            day.entries.iter().map(|e| e.seconds_spent).sum::<u64>()
        );
        assert_eq!(
            day.productivity_score,
            productivity_score(2, 3, 3600)
        );
        assert_eq!(day.daily_progress_pct(), 67);
        assert_eq!(day.formatted_study_time(), "1h 0m");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut day = DaySummary::empty(date());
        day.push(entry(60, true));
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2024-03-11");
        assert_eq!(json["totalStudySeconds"], 60);
        assert_eq!(json["entries"][0]["secondsSpent"], 60);
        assert!(json["entries"][0].get("category").is_none());
    }
}
