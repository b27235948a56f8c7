use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::SummaryEntry;
use crate::timer::{ThresholdLevel, TimerState};

/// Every state change of the timer produces an Event.
/// Drivers print or forward them; `None` from a command means nothing changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TaskStarted {
        task_id: String,
        task_name: String,
        mode: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// The active session was pointed at another task without touching the countdown.
    TaskChanged {
        from_task_id: String,
        task_id: String,
        task_name: String,
        mode: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        task_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        task_id: String,
        remaining_secs: u64,
        paused_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        task_id: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        task_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ThresholdReached {
        task_id: String,
        level: ThresholdLevel,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        entry: SummaryEntry,
        at: DateTime<Utc>,
    },
    DayEnded {
        date: NaiveDate,
        total_study_secs: u64,
        completed_tasks: u32,
        total_tasks: u32,
        productivity_score: u8,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        task_id: Option<String>,
        task_name: Option<String>,
        mode: Option<String>,
        remaining_secs: u64,
        total_secs: u64,
        time_left: String,
        progress_pct: u8,
        total_paused_secs: u64,
        show_floating_timer: bool,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_snake_case() {
        let event = Event::TimerPaused {
            task_id: "t1".into(),
            remaining_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_paused");
        assert_eq!(json["remaining_secs"], 42);
    }
}
