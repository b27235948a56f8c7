use clap::Subcommand;
use ritmo_core::{Config, TaskRef, TickHandle, TimerEngine, TimerMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::{emit, open_engine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a task in the foreground until it completes or is stopped.
    ///
    /// Reads commands from stdin while running: `p` pause/resume, `r` reset,
    /// `s` stop, `c` complete now, `switch [--mode MODE] ID NAME` change task,
    /// `sync SECS` overwrite remaining time, `f` toggle floating timer,
    /// `status` print a snapshot, `q` quit without recording.
    Run {
        /// Task ID
        task_id: String,
        /// Task name (defaults to the ID)
        #[arg(long)]
        name: Option<String>,
        /// Task category
        #[arg(long)]
        category: Option<String>,
        /// Named mode from config (defaults to timer.default_mode)
        #[arg(long)]
        mode: Option<String>,
        /// Override the mode's length in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// List configured timer modes
    Modes,
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            task_id,
            name,
            category,
            mode,
            minutes,
        } => {
            let mut mode = match mode {
                Some(name) => config.mode(&name)?,
                None => config.default_mode()?,
            };
            if let Some(minutes) = minutes {
                mode.minutes = minutes;
            }
            let name = name.unwrap_or_else(|| task_id.clone());
            let mut task = TaskRef::new(task_id, name);
            if let Some(category) = category {
                task = task.with_category(category);
            }

            let engine = open_engine(config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(drive(engine, config, task, mode))?;
        }
        TimerAction::Modes => {
            let json = serde_json::to_string_pretty(&config.modes)?;
            println!("{json}");
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// True when a command armed a tick the driver's interval does not yet track.
fn tick_rearmed(before: Option<TickHandle>, after: Option<TickHandle>) -> bool {
    after.is_some() && after != before
}

async fn drive(
    mut engine: TimerEngine,
    config: &Config,
    task: TaskRef,
    mut mode: TimerMode,
) -> Result<(), Box<dyn std::error::Error>> {
    emit(engine.start_task(&task, &mode))?;

    let mut interval = tokio::time::interval(engine.tick_period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while engine.has_active_task() {
        tokio::select! {
            _ = interval.tick(), if engine.is_ticking() => {
                emit(engine.tick())?;
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    let before = engine.tick_handle();
                    if handle_line(&mut engine, config, &mut mode, line.trim())? == Flow::Quit {
                        break;
                    }
                    if tick_rearmed(before, engine.tick_handle()) {
                        interval.reset();
                    }
                }
                None => {
                    tracing::debug!("stdin closed, running until completion");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, discarding session");
                emit(engine.stop())?;
                break;
            }
        }
    }

    engine.shutdown();
    Ok(())
}

fn handle_line(
    engine: &mut TimerEngine,
    config: &Config,
    mode: &mut TimerMode,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(Flow::Continue);
    };

    match cmd {
        "p" | "pause" | "resume" => {
            let event = engine.pause().or_else(|| engine.resume());
            emit(event)?;
        }
        "r" | "reset" => emit(engine.reset())?,
        "s" | "stop" => emit(engine.stop())?,
        "c" | "complete" => emit(engine.complete())?,
        "switch" => {
            let mut id = parts.next();
            if id == Some("--mode") {
                let Some(name) = parts.next() else {
                    eprintln!("usage: switch [--mode MODE] ID [NAME]");
                    return Ok(Flow::Continue);
                };
                match config.mode(name) {
                    Ok(next) => *mode = next,
                    Err(e) => {
                        eprintln!("error: {e}");
                        return Ok(Flow::Continue);
                    }
                }
                id = parts.next();
            }
            let Some(id) = id else {
                eprintln!("usage: switch [--mode MODE] ID [NAME]");
                return Ok(Flow::Continue);
            };
            let rest = parts.collect::<Vec<_>>().join(" ");
            let name = if rest.is_empty() { id.to_string() } else { rest };
            emit(engine.start_task(&TaskRef::new(id, name), mode))?;
        }
        "sync" => match parts.next().map(str::parse::<u64>) {
            Some(Ok(secs)) => {
                engine.sync_remaining(secs);
                emit(Some(engine.snapshot()))?;
            }
            _ => eprintln!("usage: sync SECS"),
        },
        "f" | "float" => {
            let shown = engine.toggle_floating_timer();
            eprintln!("floating timer: {}", if shown { "shown" } else { "hidden" });
        }
        "status" => emit(Some(engine.snapshot()))?,
        "q" | "quit" => return Ok(Flow::Quit),
        other => eprintln!("unknown command: {other}"),
    }
    Ok(Flow::Continue)
}
