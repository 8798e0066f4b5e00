//! JSON adapter over a raw [`KeyValueStore`].

use std::sync::{Mutex, MutexGuard};

use log::debug;
use serde::{Serialize, de::DeserializeOwned};

use super::{KeyValueStore, StoreError};

/// Result of a read-modify-write closure passed to [`JsonStore::modify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<R> {
    /// The value was modified and must be written back.
    Persist(R),
    /// Nothing changed; skip the write.
    Keep(R),
}

impl<R> Change<R> {
    fn into_parts(self) -> (R, bool) {
        match self {
            Self::Persist(result) => (result, true),
            Self::Keep(result) => (result, false),
        }
    }
}

/// Structured access to a [`KeyValueStore`] holding JSON values.
///
/// Writes that depend on the current value go through [`JsonStore::modify`]
/// or [`JsonStore::init_if_absent`], which hold a lock for the whole
/// read-modify-write cycle. Empty stored strings count as absent.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{JsonStore, MemoryStore};
///
/// # fn main() -> Result<(), wayfarer_core::StoreError> {
/// let store = JsonStore::new(MemoryStore::default());
/// assert!(store.init_if_absent("numbers", &vec![1, 2, 3])?);
/// assert!(!store.init_if_absent("numbers", &vec![4])?);
/// assert_eq!(store.get::<Vec<u32>>("numbers")?, Some(vec![1, 2, 3]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct JsonStore<S> {
    backend: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> JsonStore<S> {
    /// Wrap `backend`.
    #[must_use]
    pub const fn new(backend: S) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Decode the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.read_raw(key)?
            .map(|text| decode(key, &text))
            .transpose()
    }

    /// Encode `value` and store it under `key`, overwriting prior content.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        self.write_value(key, value)
    }

    /// Store `default` under `key` only when nothing is stored there yet.
    ///
    /// Returns whether the default was written.
    pub fn init_if_absent<T: Serialize + ?Sized>(
        &self,
        key: &str,
        default: &T,
    ) -> Result<bool, StoreError> {
        let _guard = self.lock()?;
        if self.read_raw(key)?.is_some() {
            return Ok(false);
        }
        self.write_value(key, default)?;
        debug!("seeded default value for {key}");
        Ok(true)
    }

    /// Read the value under `key`, let `f` modify it, and write it back when
    /// `f` returns [`Change::Persist`].
    ///
    /// Returns `None` without calling `f` when no value is stored.
    pub fn modify<T, R, F>(&self, key: &str, f: F) -> Result<Option<R>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Change<R>,
    {
        let _guard = self.lock()?;
        let Some(mut value) = self.get::<T>(key)? else {
            return Ok(None);
        };
        let (result, changed) = f(&mut value).into_parts();
        if changed {
            self.write_value(key, &value)?;
        }
        Ok(Some(result))
    }

    /// Like [`JsonStore::modify`], but starts from `T::default()` when no
    /// value is stored.
    pub fn modify_or_default<T, R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> Change<R>,
    {
        let _guard = self.lock()?;
        let mut value = self.get::<T>(key)?.unwrap_or_default();
        let (result, changed) = f(&mut value).into_parts();
        if changed {
            self.write_value(key, &value)?;
        }
        Ok(result)
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.backend.read(key)?.filter(|text| !text.is_empty()))
    }

    fn write_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.backend.write(key, text)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn decode<T: DeserializeOwned>(key: &str, text: &str) -> Result<T, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Decode {
        key: key.to_owned(),
        source,
    })
}
