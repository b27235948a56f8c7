use clap::Subcommand;
use ritmo_core::Config;

use super::open_engine;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print timer preferences as JSON
    Show,
    /// Flip the floating timer preference and persist it
    ToggleFloating,
}

pub fn run(action: PrefsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;
    match action {
        PrefsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&engine.preferences())?);
        }
        PrefsAction::ToggleFloating => {
            engine.toggle_floating_timer();
            println!("{}", serde_json::to_string_pretty(&engine.preferences())?);
        }
    }
    Ok(())
}
