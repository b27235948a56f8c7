//! Timer display preferences, stored as JSON under [`PREFERENCES_KEY`].

use serde::{Deserialize, Serialize};

use super::PersistenceStore;
use crate::error::StoreError;

pub const PREFERENCES_KEY: &str = "timer-preferences";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPreferences {
    #[serde(default = "default_true")]
    pub show_floating_timer: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TimerPreferences {
    fn default() -> Self {
        Self {
            show_floating_timer: true,
        }
    }
}

impl TimerPreferences {
    /// Read preferences, falling back to defaults when absent or unreadable.
    pub fn load(store: &dyn PersistenceStore) -> Self {
        match store.get(PREFERENCES_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring malformed timer preferences");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read timer preferences");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn PersistenceStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(PREFERENCES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        assert!(TimerPreferences::load(&store).show_floating_timer);
    }

    #[test]
    fn malformed_json_yields_default() {
        let store = MemoryStore::new();
        store.set(PREFERENCES_KEY, "{not json").unwrap();
        assert_eq!(TimerPreferences::load(&store), TimerPreferences::default());
    }

    #[test]
    fn missing_field_defaults_to_visible() {
        let store = MemoryStore::new();
        store.set(PREFERENCES_KEY, "{}").unwrap();
        assert!(TimerPreferences::load(&store).show_floating_timer);
    }

    #[test]
    fn save_uses_camel_case() {
        let store = MemoryStore::new();
        TimerPreferences {
            show_floating_timer: false,
        }
        .save(&store)
        .unwrap();
        assert_eq!(
            store.get(PREFERENCES_KEY).unwrap().as_deref(),
            Some(r#"{"showFloatingTimer":false}"#)
        );
        assert!(!TimerPreferences::load(&store).show_floating_timer);
    }
}
