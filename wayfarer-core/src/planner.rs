//! Owned entry point bundling a store with an id allocator.

use crate::ids::{ClockIds, IdAllocator};
use crate::init::{InitReport, Seed, initialize};
use crate::repository::{PoiRepository, TripRepository};
use crate::store::{JsonStore, KeyValueStore, StoreError};

/// A travel planner over one key-value backend.
///
/// # Examples
/// ```
/// use wayfarer_core::{MemoryStore, NewMap, Planner, Seed};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let planner = Planner::new(MemoryStore::default());
/// planner.initialize(&Seed::bundled()?)?;
/// let trip = planner
///     .trips()
///     .add_map(NewMap {
///         name: "Napoli".into(),
///         ..NewMap::default()
///     })?
///     .expect("seeded user exists");
/// assert!(!trip.selected);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Planner<S, A = ClockIds> {
    store: JsonStore<S>,
    ids: A,
}

impl<S: KeyValueStore> Planner<S> {
    /// Plan over `backend`, minting ad hoc ids from the clock.
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_ids(backend, ClockIds::default())
    }
}

impl<S: KeyValueStore, A: IdAllocator> Planner<S, A> {
    /// Plan over `backend` with a custom id allocator.
    #[must_use]
    pub const fn with_ids(backend: S, ids: A) -> Self {
        Self {
            store: JsonStore::new(backend),
            ids,
        }
    }

    /// The underlying JSON store.
    #[must_use]
    pub const fn store(&self) -> &JsonStore<S> {
        &self.store
    }

    /// Catalog operations.
    #[must_use]
    pub const fn pois(&self) -> PoiRepository<'_, S> {
        PoiRepository::new(&self.store)
    }

    /// Trip operations.
    #[must_use]
    pub const fn trips(&self) -> TripRepository<'_, S, A> {
        TripRepository::new(&self.store, &self.ids)
    }

    /// Seed absent keys and project saved POIs, see [`initialize`].
    pub fn initialize(&self, seed: &Seed) -> Result<InitReport, StoreError> {
        initialize(&self.store, seed)
    }
}
