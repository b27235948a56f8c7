mod engine;
mod session;

pub use engine::{TimerEngine, TimerState, TICK_PERIOD};
pub use session::{format_mm_ss, Session, TaskRef, ThresholdLevel, TimerMode};
