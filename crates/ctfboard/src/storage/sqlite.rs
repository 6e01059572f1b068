//! `SQLite`-backed record store.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::{migrations, RecordStore};
use crate::error::{Error, Result};

/// Format of `SQLite`'s `datetime('now')`.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persistent [`RecordStore`] in a single `SQLite` database file.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a record database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!(path = %path.display(), "opening record database");
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!(path = %path.display(), "record database opened");
        Ok(Self { path, conn })
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let record_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;

        let last_write: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM records ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let last_write = last_write
            .and_then(|s| NaiveDateTime::parse_from_str(&s, SQLITE_DATETIME_FORMAT).ok())
            .map(|dt| dt.and_utc());

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            record_count,
            last_write,
            db_size_bytes,
        })
    }
}

impl RecordStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO records (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            ",
            (key, value),
        )?;
        debug!(key, bytes = value.len(), "record written");
        Ok(())
    }
}

/// Statistics about the record database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored records.
    pub record_count: i64,
    /// When any record was last written.
    pub last_write: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test store")
    }

    fn cleanup(db_path: &Path) {
        let _ = std::fs::remove_file(db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_read_missing_key() {
        let store = create_test_store();
        assert_eq!(store.read("ctfParticipants").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let mut store = create_test_store();
        store.write("ctfResults", "[]").unwrap();

        assert_eq!(store.read("ctfResults").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_overwrites() {
        let mut store = create_test_store();
        store.write("k", "first").unwrap();
        store.write("k", "second").unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some("second"));
        assert_eq!(store.stats().unwrap().record_count, 1);
    }

    #[test]
    fn test_unicode_value() {
        let mut store = create_test_store();
        let value = r#"[{"teamName":"Équipe 🚩"}]"#;
        store.write("k", value).unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_store().stats().unwrap();

        assert_eq!(stats.record_count, 0);
        assert!(stats.last_write.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_records() {
        let mut store = create_test_store();
        store.write("a", "[]").unwrap();
        store.write("b", "[]").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.record_count, 2);
        assert!(stats.last_write.is_some());
    }

    #[test]
    fn test_path() {
        assert_eq!(create_test_store().path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path = std::env::temp_dir().join(format!("ctfboard_test_{}.db", std::process::id()));

        {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.write("ctfParticipants", "[1,2,3]").unwrap();
            assert_eq!(store.path(), db_path);
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(
            store.read("ctfParticipants").unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert!(store.stats().unwrap().db_size_bytes > 0);

        drop(store);
        cleanup(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let nested_path = std::env::temp_dir().join(format!(
            "ctfboard_test_{}/nested/board.db",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let store = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }
}
