use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::Severity;

/// The task a session is timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TaskRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A named countdown length, e.g. `pomodoro` = 25 minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerMode {
    pub name: String,
    pub minutes: u32,
}

impl TimerMode {
    pub fn new(name: impl Into<String>, minutes: u32) -> Self {
        Self {
            name: name.into(),
            minutes,
        }
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.minutes) * 60
    }
}

/// Remaining-time alerts, each fired at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdLevel {
    FiveMinutes,
    LastMinute,
}

impl ThresholdLevel {
    pub const ALL: [ThresholdLevel; 2] = [ThresholdLevel::FiveMinutes, ThresholdLevel::LastMinute];

    pub fn remaining_secs(self) -> u64 {
        match self {
            ThresholdLevel::FiveMinutes => 300,
            ThresholdLevel::LastMinute => 60,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ThresholdLevel::FiveMinutes => Severity::Warning,
            ThresholdLevel::LastMinute => Severity::Error,
        }
    }

    pub fn at_remaining(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.remaining_secs() == secs)
    }
}

/// The single running or paused task countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub task_id: String,
    pub task_name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub mode: String,
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_paused_seconds: u64,
    #[serde(default)]
    pub(crate) fired: Vec<ThresholdLevel>,
}

impl Session {
    pub(crate) fn new(task: &TaskRef, mode: &TimerMode, now: DateTime<Utc>) -> Self {
        let total = mode.total_secs();
        Self {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            category: task.category.clone(),
            mode: mode.name.clone(),
            seconds_remaining: total,
            total_seconds: total,
            started_at: now,
            paused_at: None,
            total_paused_seconds: 0,
            fired: Vec::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_seconds.saturating_sub(self.seconds_remaining)
    }

    /// 0..=100, rounded.
    pub fn progress_pct(&self) -> u8 {
        if self.total_seconds == 0 {
            return 0;
        }
        let pct = (self.elapsed_secs() as f64 / self.total_seconds as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// `MM:SS` of the remaining time. Minutes are not wrapped at 60.
    pub fn time_left(&self) -> String {
        format_mm_ss(self.seconds_remaining)
    }

    pub fn has_fired(&self, level: ThresholdLevel) -> bool {
        self.fired.contains(&level)
    }

    pub(crate) fn retarget(&mut self, task: &TaskRef, mode: &TimerMode) {
        self.task_id = task.id.clone();
        self.task_name = task.name.clone();
        self.category = task.category.clone();
        self.mode = mode.name.clone();
    }
}

pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
