//! Identifier minting for POIs created directly on a trip.
//!
//! Catalog POIs and trips use `max + 1` allocation over their own collection.
//! Ad hoc trip entries instead draw from an [`IdAllocator`] so their ids stay
//! clear of the small catalog range.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of fresh identifiers for ad hoc saved POIs.
pub trait IdAllocator {
    /// Return an identifier never returned before by this allocator.
    fn next_id(&self) -> u64;
}

/// Millisecond-clock ids that stay strictly increasing.
///
/// Each id is the current Unix time in milliseconds, or one past the previous
/// id when the clock has not advanced.
///
/// # Examples
/// ```
/// use wayfarer_core::{ClockIds, IdAllocator};
///
/// let ids = ClockIds::default();
/// let first = ids.next_id();
/// let second = ids.next_id();
/// assert!(second > first);
/// ```
#[derive(Debug, Default)]
pub struct ClockIds {
    last: Mutex<u64>,
}

impl IdAllocator for ClockIds {
    fn next_id(&self) -> u64 {
        let now = now_millis();
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = now.max(last.saturating_add(1));
        *last = id;
        id
    }
}

impl<A: IdAllocator + ?Sized> IdAllocator for &A {
    fn next_id(&self) -> u64 {
        (**self).next_id()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
