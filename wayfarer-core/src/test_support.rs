//! In-memory doubles used by unit and behaviour tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ids::IdAllocator;
use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// [`MemoryStore`] that counts successful writes.
///
/// Lets tests assert that a no-op mutation left the store untouched.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl RecordingStore {
    /// Number of writes performed so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The raw stored string for `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.read(key).ok().flatten()
    }
}

impl KeyValueStore for RecordingStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.inner.write(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Deterministic [`IdAllocator`] counting up from a starting value.
#[derive(Debug)]
pub struct SequentialIds {
    next: Mutex<u64>,
}

impl SequentialIds {
    /// Allocate ids starting at `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: Mutex::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&self) -> u64 {
        let mut next = match self.next.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = *next;
        *next = id.saturating_add(1);
        id
    }
}
