//! Facade crate for the Wayfarer travel planner.
//!
//! This crate re-exports the core domain types and repositories and exposes
//! the SQLite-backed store behind a feature flag.

#![forbid(unsafe_code)]

pub use wayfarer_core::{
    ClockIds, IdAllocator, InitReport, JsonStore, KeyValueStore, MapEdit, MemoryStore, NewMap,
    NewPoi, Noop, Planner, Poi, PoiRepository, SavedPoi, SavedPoiOptions, SavedPoiPatch, Seed,
    SeedError, StorageKey, StoreError, TripMap, TripRepository, User, WriteOutcome, initialize,
    marker, schedule,
};

#[cfg(feature = "store-sqlite")]
pub use wayfarer_core::{SqliteStore, SqliteStoreError};
