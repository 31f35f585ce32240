use crate::infrastructure::error::JournalError;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub fn initialize_database(path: &Path) -> Result<(), JournalError> {
    let connection = Connection::open(path)?;
    connection.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Flat keyed blob storage the journal persists through. One fixed key holds
/// the whole record set; preference values live under their own keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, JournalError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), JournalError>;
}

#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db_path: PathBuf,
}

impl SqliteKeyValueStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, JournalError> {
        Connection::open(&self.db_path).map_err(JournalError::from)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>, JournalError> {
        let connection = self.connect()?;
        let value = connection
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), JournalError> {
        let connection = self.connect()?;
        connection.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>, JournalError> {
        let entries = self
            .entries
            .lock()
            .map_err(|error| JournalError::Storage(format!("store lock poisoned: {error}")))?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), JournalError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|error| JournalError::Storage(format!("store lock poisoned: {error}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
