use clap::{Parser, Subcommand};
use ritmo_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "ritmo", version, about = "Ritmo CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run and control the task timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Daily summaries
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Timer display preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("RITMO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&config);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "using default configuration");
    }

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Day { action } => commands::day::run(action, &config),
        Commands::Prefs { action } => commands::prefs::run(action, &config),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
