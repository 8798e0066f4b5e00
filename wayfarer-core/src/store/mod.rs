//! Persistent key-value storage for the POI catalog and the user record.
//!
//! [`KeyValueStore`] is the raw capability: string values under string keys,
//! each call immediately durable. [`JsonStore`] layers JSON encoding and the
//! seed-if-absent and read-modify-write helpers the repositories rely on.

use std::fmt;

use thiserror::Error;

mod json;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use json::{Change, JsonStore};
pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteStore, SqliteStoreError};

/// Raw string storage keyed by name.
///
/// Implementations use interior mutability so one store can be shared by
/// several repositories.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::default();
/// store.write("poi", "[]".to_owned()).expect("write");
/// assert_eq!(store.read("poi").expect("read").as_deref(), Some("[]"));
/// assert_eq!(store.read("user").expect("read"), None);
/// ```
pub trait KeyValueStore {
    /// Return the value stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: String) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// The two top-level keys of the persisted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The POI catalog, a JSON array of [`crate::Poi`].
    Poi,
    /// The user record, a JSON object holding `maps`.
    User,
}

impl StorageKey {
    /// Key under which the value is stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poi => "poi",
            Self::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while reading or writing stored values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored value could not be decoded.
    #[error("failed to decode value stored under {key}: {source}")]
    Decode {
        /// Key whose value was malformed.
        key: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The value could not be encoded.
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
    /// The SQLite backend failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Sqlite(#[from] SqliteStoreError),
}
