//! SQLite-backed key-value store.
//!
//! One `kv` table holds preferences and every day summary. Writes are plain
//! `INSERT OR REPLACE`, so the last writer wins.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, PersistenceStore};
use crate::error::StoreError;

/// SQLite database holding the key-value store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `<data_dir>/ritmo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(data_dir()?.join("ritmo.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
        })
    }

    /// Keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM kv WHERE key LIKE ?1 ORDER BY key")?;
            let rows = stmt.query_map(params![format!("{prefix}%")], |row| row.get(0))?;
            let keys = rows.collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Locked)?;
        Ok(f(&conn)?)
    }
}

impl PersistenceStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn set_overwrites_existing_value() {
        let db = Database::open_memory().unwrap();
        db.set("k", "one").unwrap();
        db.set("k", "two").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn keys_with_prefix_filters_and_sorts() {
        let db = Database::open_memory().unwrap();
        db.set("day-summary-2024-03-12", "{}").unwrap();
        db.set("timer-preferences", "{}").unwrap();
        db.set("day-summary-2024-03-11", "{}").unwrap();
        let keys = db.keys_with_prefix("day-summary-").unwrap();
        assert_eq!(
            keys,
            vec!["day-summary-2024-03-11", "day-summary-2024-03-12"]
        );
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ritmo.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("k", "v").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
    }
}
