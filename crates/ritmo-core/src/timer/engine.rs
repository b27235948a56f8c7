//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine over a single optional
//! [`Session`]. It never sleeps: it asks the injected [`Clock`] to arm a
//! periodic tick and the driver calls [`TimerEngine::tick`] once per period
//! while [`TimerEngine::is_ticking`] holds.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |            |
//!           +-> Completing -> Idle      (countdown reached zero)
//! Running | Paused -> Idle              (stop)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(clock, store, sink, presenter);
//! engine.start_task(&task, &mode);
//! // Once per second:
//! engine.tick(); // Some(Event::TaskCompleted { .. }) at zero
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{Session, TaskRef, ThresholdLevel, TimerMode};
use crate::clock::{Clock, TickHandle};
use crate::events::Event;
use crate::notify::{Notification, NotificationSink, Severity, SummaryPresenter};
use crate::storage::{PersistenceStore, TimerPreferences};
use crate::summary::{DailyAggregator, DaySummary, SummaryEntry};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown hit zero and the entry is being aggregated.
    Completing,
}

/// Core timer engine.
///
/// Owns the single current session, the current day summary (through its
/// [`DailyAggregator`]) and the live tick handle.
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    store: Arc<dyn PersistenceStore>,
    sink: Arc<dyn NotificationSink>,
    aggregator: DailyAggregator,
    preferences: TimerPreferences,
    state: TimerState,
    session: Option<Session>,
    tick_handle: Option<TickHandle>,
    tick_period: Duration,
}

impl TimerEngine {
    /// Create an idle engine. Preferences are read from `store` right away.
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn PersistenceStore>,
        sink: Arc<dyn NotificationSink>,
        presenter: Arc<dyn SummaryPresenter>,
    ) -> Self {
        let preferences = TimerPreferences::load(store.as_ref());
        let aggregator = DailyAggregator::new(Arc::clone(&store), presenter);
        Self {
            clock,
            store,
            sink,
            aggregator,
            preferences,
            state: TimerState::Idle,
            session: None,
            tick_handle: None,
            tick_period: TICK_PERIOD,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn has_active_task(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_task_active(&self, task_id: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.task_id == task_id)
    }

    pub fn is_task_paused(&self, task_id: &str) -> bool {
        self.is_task_active(task_id) && self.state == TimerState::Paused
    }

    /// Whether a driver should currently deliver ticks.
    pub fn is_ticking(&self) -> bool {
        self.tick_handle.is_some()
    }

    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick_handle
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn preferences(&self) -> TimerPreferences {
        self.preferences
    }

    pub fn is_timer_visible(&self) -> bool {
        self.preferences.show_floating_timer && self.has_active_task()
    }

    pub fn day_summary(&self) -> Option<&DaySummary> {
        self.aggregator.current()
    }

    pub fn aggregator_mut(&mut self) -> &mut DailyAggregator {
        &mut self.aggregator
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let s = self.session.as_ref();
        Event::StateSnapshot {
            state: self.state,
            task_id: s.map(|s| s.task_id.clone()),
            task_name: s.map(|s| s.task_name.clone()),
            mode: s.map(|s| s.mode.clone()),
            remaining_secs: s.map_or(0, |s| s.seconds_remaining),
            total_secs: s.map_or(0, |s| s.total_seconds),
            time_left: s.map_or_else(|| "00:00".to_string(), Session::time_left),
            progress_pct: s.map_or(0, Session::progress_pct),
            total_paused_secs: s.map_or(0, |s| s.total_paused_seconds),
            show_floating_timer: self.preferences.show_floating_timer,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start `task`, retarget the running session to it, or toggle
    /// pause/resume when it is already the active task.
    pub fn start_task(&mut self, task: &TaskRef, mode: &TimerMode) -> Option<Event> {
        let now = self.clock.now();
        match self.session.as_ref().map(|s| s.task_id == task.id) {
            None => return Some(self.begin_session(task, mode, now)),
            Some(true) => {
                return match self.state {
                    TimerState::Paused => self.resume(),
                    _ => self.pause(),
                };
            }
            Some(false) => {}
        }

        let session = self.session.as_mut()?;
        let from_task_id = session.task_id.clone();
        session.retarget(task, mode);
        let remaining_secs = session.seconds_remaining;
        tracing::debug!(%from_task_id, task_id = %task.id, remaining_secs, "task changed");
        self.notify(
            "Task changed",
            format!("Now working on: {}", task.name),
            Severity::Info,
        );
        Some(Event::TaskChanged {
            from_task_id,
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            mode: mode.name.clone(),
            remaining_secs,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        session.paused_at = Some(now);
        let event = Event::TimerPaused {
            task_id: session.task_id.clone(),
            remaining_secs: session.seconds_remaining,
            at: now,
        };
        let message = format!("{} is paused", session.task_name);
        self.cancel_tick();
        self.state = TimerState::Paused;
        self.notify("Timer paused", message, Severity::Warning);
        Some(event)
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        let paused_secs = session
            .paused_at
            .take()
            .map(|since| (now - since).num_seconds().max(0) as u64)
            .unwrap_or(0);
        session.total_paused_seconds += paused_secs;
        let event = Event::TimerResumed {
            task_id: session.task_id.clone(),
            remaining_secs: session.seconds_remaining,
            paused_secs,
            at: now,
        };
        let message = format!("Continuing: {}", session.task_name);
        self.arm_tick();
        self.state = TimerState::Running;
        self.notify("Timer resumed", message, Severity::Info);
        Some(event)
    }

    /// Restart the countdown of the current session from full length.
    pub fn reset(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        session.seconds_remaining = session.total_seconds;
        session.started_at = now;
        session.paused_at = None;
        session.total_paused_seconds = 0;
        session.fired.clear();
        let event = Event::TimerReset {
            task_id: session.task_id.clone(),
            total_secs: session.total_seconds,
            at: now,
        };
        let message = format!("{} has been restarted", session.task_name);
        self.arm_tick();
        self.state = TimerState::Running;
        self.notify("Timer reset", message, Severity::Info);
        Some(event)
    }

    /// Discard the session without recording it.
    pub fn stop(&mut self) -> Option<Event> {
        self.cancel_tick();
        self.state = TimerState::Idle;
        let session = self.session.take()?;
        tracing::debug!(task_id = %session.task_id, "timer stopped");
        Some(Event::TimerStopped {
            task_id: session.task_id,
            remaining_secs: session.seconds_remaining,
            at: self.clock.now(),
        })
    }

    /// Toggle pause/resume only if `task_id` is the active task.
    pub fn pause_resume_task(&mut self, task_id: &str) -> Option<Event> {
        if !self.is_task_active(task_id) {
            return None;
        }
        match self.state {
            TimerState::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Stop only if `task_id` is the active task.
    pub fn stop_task(&mut self, task_id: &str) -> Option<Event> {
        if !self.is_task_active(task_id) {
            return None;
        }
        self.stop()
    }

    /// Overwrite the remaining time, e.g. after syncing with another view.
    pub fn sync_remaining(&mut self, seconds: u64) {
        if let Some(session) = self.session.as_mut() {
            session.seconds_remaining = seconds.min(session.total_seconds);
        }
    }

    /// Advance the countdown by one period.
    ///
    /// Returns a threshold event at exactly 300 s / 60 s remaining, and the
    /// completion event when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let session = self.session.as_mut()?;
        if session.seconds_remaining > 0 {
            session.seconds_remaining -= 1;
        }
        let remaining = session.seconds_remaining;
        if remaining == 0 {
            return self.complete();
        }

        let level = ThresholdLevel::at_remaining(remaining)?;
        if session.has_fired(level) {
            return None;
        }
        session.fired.push(level);
        let task_id = session.task_id.clone();
        let (title, message) = match level {
            ThresholdLevel::FiveMinutes => (
                "5 minutes left",
                format!("5 minutes remaining for: {}", session.task_name),
            ),
            ThresholdLevel::LastMinute => (
                "Last minute!",
                format!("1 minute remaining for: {}", session.task_name),
            ),
        };
        self.notify(title, message, level.severity());
        Some(Event::ThresholdReached {
            task_id,
            level,
            remaining_secs: remaining,
            at: self.clock.now(),
        })
    }

    /// Finish the active session now and record it as completed.
    pub fn complete(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let session = self.session.take()?;
        self.state = TimerState::Completing;
        self.cancel_tick();

        let message = format!("{} was completed successfully", session.task_name);
        let entry = SummaryEntry {
            seconds_spent: session.elapsed_secs(),
            task_id: session.task_id,
            task_name: session.task_name,
            mode: session.mode,
            completed: true,
            category: session.category,
        };

        self.aggregator.ensure_day(now.date_naive());
        self.aggregator.record_completion(entry.clone());
        tracing::debug!(task_id = %entry.task_id, secs = entry.seconds_spent, "task completed");
        self.notify("Task completed!", message, Severity::Success);

        self.state = TimerState::Idle;
        Some(Event::TaskCompleted { entry, at: now })
    }

    /// Persist today's summary and signal the presenter to show it.
    pub fn end_day(&mut self) -> Option<Event> {
        let summary = self.aggregator.end_day()?;
        Some(Event::DayEnded {
            date: summary.date,
            total_study_secs: summary.total_study_seconds,
            completed_tasks: summary.completed_task_count,
            total_tasks: summary.total_task_count,
            productivity_score: summary.productivity_score,
            at: self.clock.now(),
        })
    }

    /// Make today's summary current, loading it from the store if needed.
    pub fn load_today(&mut self) -> &DaySummary {
        let today = self.clock.now().date_naive();
        self.aggregator.ensure_day(today)
    }

    pub fn toggle_floating_timer(&mut self) -> bool {
        self.preferences.show_floating_timer = !self.preferences.show_floating_timer;
        if let Err(e) = self.preferences.save(self.store.as_ref()) {
            tracing::warn!(error = %e, "failed to persist timer preferences");
        }
        self.preferences.show_floating_timer
    }

    /// Disarm any live tick. The session, if any, is kept.
    pub fn shutdown(&mut self) {
        self.cancel_tick();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_session(&mut self, task: &TaskRef, mode: &TimerMode, now: DateTime<Utc>) -> Event {
        let session = Session::new(task, mode, now);
        let total_secs = session.total_seconds;
        self.session = Some(session);
        self.state = TimerState::Running;
        self.arm_tick();
        self.aggregator.ensure_day(now.date_naive());
        tracing::debug!(task_id = %task.id, total_secs, "task started");
        self.notify(
            "Task started",
            format!("Starting: {}", task.name),
            Severity::Info,
        );
        Event::TaskStarted {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            mode: mode.name.clone(),
            total_secs,
            at: now,
        }
    }

    fn arm_tick(&mut self) {
        self.cancel_tick();
        self.tick_handle = Some(self.clock.schedule_tick(self.tick_period));
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.clock.cancel(handle);
        }
    }

    fn notify(&self, title: &str, message: String, severity: Severity) {
        self.sink
            .emit(Notification::new(title, message, severity, self.clock.now()));
    }
}
