//! SQLite-backed local storage.
//!
//! The database lives at `~/.danjicare/danjicare.db` unless the config points
//! elsewhere. It holds a single `local_storage` table mapping a key to the
//! JSON text of one store.

use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::StorageBackend;
use crate::error::StorageError;

pub const DB_FILE_NAME: &str = "danjicare.db";

pub struct SqliteStorage {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStorage {
    /// Open (or create) the database in the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(Self::default_path()?)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StorageError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;

        log::debug!("Opened local storage at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Open the database inside `dir`, e.g. a configured data directory.
    pub fn open_in(dir: &Path) -> Result<Self, StorageError> {
        Self::open_at(dir.join(DB_FILE_NAME))
    }

    pub fn default_dir() -> Result<PathBuf, StorageError> {
        let home = dirs::home_dir().ok_or(StorageError::HomeDirNotFound)?;
        Ok(home.join(".danjicare"))
    }

    fn default_path() -> Result<PathBuf, StorageError> {
        Ok(Self::default_dir()?.join(DB_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}
