//! SQLite-backed key-value store for durable local state.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use super::{KeyValueStore, StoreError};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Error raised by [`SqliteStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the key-value table failed.
    #[error("failed to prepare key-value schema: {source}")]
    Schema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading or writing values.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Durable [`KeyValueStore`] keeping every key in a single SQLite table.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::with_connection(connection, None)
    }

    /// Location of the database file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_connection(
        connection: Connection,
        path: Option<PathBuf>,
    ) -> Result<Self, SqliteStoreError> {
        connection
            .execute(CREATE_TABLE, [])
            .map_err(|source| SqliteStoreError::Schema { source })?;
        Ok(Self {
            connection: Mutex::new(connection),
            path,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        let value = connection
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(SqliteStoreError::from)?;
        Ok(value)
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        connection
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(SqliteStoreError::from)?;
        Ok(())
    }
}
