//! Core storage and domain layer for the Wayfarer travel planner.
//!
//! Two JSON values make up all persisted state: the POI catalog and the
//! single user record holding the trips ("maps"). [`initialize`] seeds them
//! on first run; [`PoiRepository`] and [`TripRepository`] mutate them by
//! whole-value read-modify-write through a [`JsonStore`]. The [`marker`]
//! module turns POIs into map marker descriptors.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ids;
mod init;
pub mod marker;
mod planner;
mod poi;
mod repository;
pub mod schedule;
mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(all(docsrs, not(test)), doc(cfg(feature = "test-support")))]
pub mod test_support;
mod trip;

pub use ids::{ClockIds, IdAllocator};
pub use init::{InitReport, Seed, SeedError, initialize};
pub use planner::Planner;
pub use poi::{DEFAULT_CATEGORY, NewPoi, Poi};
pub use repository::{Noop, PoiRepository, TripRepository, WriteOutcome};
pub use store::{Change, JsonStore, KeyValueStore, MemoryStore, StorageKey, StoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteStore, SqliteStoreError};
pub use trip::{
    DEFAULT_COLOR, DEFAULT_IMAGE_URL, MapEdit, NewMap, SavedPoi, SavedPoiOptions, SavedPoiPatch,
    TripMap, User,
};
