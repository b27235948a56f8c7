//! # Ritmo Core Library
//!
//! Session timer and daily aggregator for the Ritmo productivity app.
//! The library holds all behavior; `ritmo-cli` is a thin driver over it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine owning at most one task
//!   session. The caller delivers ticks; the engine only arms and cancels them
//!   through an injected [`Clock`].
//! - **Daily Aggregator**: folds completed sessions into a per-date
//!   [`DaySummary`] with a productivity score.
//! - **Storage**: key-value [`PersistenceStore`] (SQLite or in-memory),
//!   timer preferences and TOML configuration.
//! - **Notifications**: fire-and-forget [`NotificationSink`] and
//!   [`SummaryPresenter`] collaborators.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`DailyAggregator`]: per-day summary owner
//! - [`Database`]: SQLite-backed store
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod summary;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, TickHandle};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use notify::{
    Notification, NotificationSink, RecordingNotifier, Severity, SummaryPresenter,
    TracingNotifier,
};
pub use storage::{Config, Database, MemoryStore, PersistenceStore, TimerPreferences};
pub use summary::{productivity_score, DailyAggregator, DaySummary, SummaryEntry};
pub use timer::{Session, TaskRef, ThresholdLevel, TimerEngine, TimerMode, TimerState};
