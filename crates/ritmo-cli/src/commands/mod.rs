pub mod config;
pub mod day;
pub mod prefs;
pub mod timer;

use std::sync::Arc;

use ritmo_core::{
    Config, Database, Event, NotificationSink, SystemClock, TimerEngine, TracingNotifier,
};

use crate::console::ConsoleNotifier;

/// Build an engine over the on-disk store and the system clock.
///
/// With notifications disabled, signals only reach the log.
pub(crate) fn open_engine(config: &Config) -> ritmo_core::error::Result<TimerEngine> {
    let store = Arc::new(Database::open()?);
    let console = Arc::new(ConsoleNotifier);
    let sink: Arc<dyn NotificationSink> = if config.notifications.enabled {
        console.clone()
    } else {
        Arc::new(TracingNotifier)
    };
    let engine = TimerEngine::new(Arc::new(SystemClock::new()), store, sink, console)
        .with_tick_period(config.tick_period());
    Ok(engine)
}

/// Print an event as a single JSON line on stdout.
pub(crate) fn emit(event: Option<Event>) -> serde_json::Result<()> {
    if let Some(event) = event {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
