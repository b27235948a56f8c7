mod config;
pub mod database;
mod memory;
mod preferences;

pub use config::{Config, LogConfig, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use preferences::{TimerPreferences, PREFERENCES_KEY};

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::StoreError;

/// Key-value storage for preferences and day summaries.
///
/// Values are JSON strings. There is no schema versioning: callers must
/// treat a missing or unreadable value as "use the default".
pub trait PersistenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// `day-summary-2024-03-11`
pub fn day_summary_key(date: NaiveDate) -> String {
    format!("day-summary-{}", date.format("%Y-%m-%d"))
}

/// Returns the data directory.
///
/// `RITMO_DATA_DIR` wins when set. Otherwise `~/.config/ritmo[-dev]/`,
/// with `RITMO_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("RITMO_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RITMO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ritmo-dev")
            } else {
                base_dir.join("ritmo")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_summary_key_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(day_summary_key(date), "day-summary-2024-01-05");
    }
}
