use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use ritmo_core::summary::load_summary;
use ritmo_core::{Config, Database, DaySummary};

use super::{emit, open_engine};

const SUMMARY_PREFIX: &str = "day-summary-";

#[derive(Subcommand)]
pub enum DayAction {
    /// Print a day's summary as JSON
    Show {
        /// Date (YYYY-MM-DD, defaults to today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List dates with a stored summary
    List,
    /// Start a fresh, empty summary for today
    Start,
    /// Persist and display today's summary
    End,
}

pub fn run(action: DayAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DayAction::Show { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let db = Database::open()?;
            let summary = load_summary(&db, date).unwrap_or_else(|| DaySummary::empty(date));
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        DayAction::List => {
            let db = Database::open()?;
            for key in db.keys_with_prefix(SUMMARY_PREFIX)? {
                if let Some(date) = key.strip_prefix(SUMMARY_PREFIX) {
                    println!("{date}");
                }
            }
        }
        DayAction::Start => {
            let mut engine = open_engine(config)?;
            let today = Utc::now().date_naive();
            let summary = engine.aggregator_mut().start_day(today);
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        DayAction::End => {
            let mut engine = open_engine(config)?;
            engine.load_today();
            emit(engine.end_day())?;
        }
    }
    Ok(())
}
