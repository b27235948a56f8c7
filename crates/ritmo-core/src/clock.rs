//! Time source and tick scheduling.
//!
//! The engine never sleeps or spawns anything. It asks the clock to arm a
//! periodic tick and gets back a [`TickHandle`]; the driver (CLI loop, test
//! harness) then calls [`TimerEngine::tick`](crate::TimerEngine::tick) once
//! per period for as long as that handle is live.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an armed periodic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickHandle(pub u64);

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Arm a periodic tick. The returned handle stays live until cancelled.
    fn schedule_tick(&self, period: Duration) -> TickHandle;

    /// Disarm a tick. Cancelling an unknown or already-cancelled handle is a no-op.
    fn cancel(&self, handle: TickHandle);
}

/// Wall-clock time with handle bookkeeping.
///
/// Ticks are delivered by whoever owns the engine; this type only keeps
/// track of which handle, if any, is armed and at what period.
#[derive(Debug, Default)]
pub struct SystemClock {
    next_id: AtomicU64,
    armed: Mutex<Option<(TickHandle, Duration)>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of the currently armed tick, if any.
    pub fn armed_period(&self) -> Option<Duration> {
        self.armed
            .lock()
            .ok()
            .and_then(|armed| armed.as_ref().map(|(_, period)| *period))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule_tick(&self, period: Duration) -> TickHandle {
        let handle = TickHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        if let Ok(mut armed) = self.armed.lock() {
            *armed = Some((handle, period));
        }
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        if let Ok(mut armed) = self.armed.lock() {
            if matches!(*armed, Some((live, _)) if live == handle) {
                *armed = None;
            }
        }
    }
}

#[derive(Debug)]
struct ManualState {
    now: DateTime<Utc>,
    next_id: u64,
    live: BTreeSet<TickHandle>,
    scheduled: u64,
}

/// Deterministic clock for tests and simulations.
///
/// Cloning yields another handle onto the same state, so a test can keep one
/// copy to advance time while the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: start,
                next_id: 0,
                live: BTreeSet::new(),
                scheduled: 0,
            })),
        }
    }

    /// Clock starting at 2024-03-11 09:00:00 UTC.
    pub fn at_default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        )
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.with_state(|state| state.now += by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(chrono::Duration::seconds(secs));
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.with_state(|state| state.now = now);
    }

    /// Number of ticks currently armed.
    pub fn live_ticks(&self) -> usize {
        self.with_state(|state| state.live.len())
    }

    /// Total number of `schedule_tick` calls so far.
    pub fn scheduled_count(&self) -> u64 {
        self.with_state(|state| state.scheduled)
    }

    pub fn is_live(&self, handle: TickHandle) -> bool {
        self.with_state(|state| state.live.contains(&handle))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ManualState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.with_state(|state| state.now)
    }

    fn schedule_tick(&self, _period: Duration) -> TickHandle {
        self.with_state(|state| {
            state.next_id += 1;
            state.scheduled += 1;
            let handle = TickHandle(state.next_id);
            state.live.insert(handle);
            handle
        })
    }

    fn cancel(&self, handle: TickHandle) {
        self.with_state(|state| {
            state.live.remove(&handle);
        });
    }
}
