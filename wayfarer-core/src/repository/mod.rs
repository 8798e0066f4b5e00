//! Repositories over the stored POI catalog and user record.
//!
//! Every mutation rewrites the whole stored value. Missing records never
//! surface as errors: reads return `None` or empty collections and writes
//! report [`WriteOutcome::Unchanged`] with the reason, leaving the store as
//! it was. Only backend and encoding failures produce a
//! [`StoreError`](crate::StoreError).

use std::fmt;

mod poi;
mod trips;

pub use poi::PoiRepository;
pub use trips::TripRepository;

/// Whether a repository mutation touched the store.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The updated value was persisted.
    Written,
    /// Nothing was written.
    Unchanged(Noop),
}

impl WriteOutcome {
    /// Whether the store was written.
    #[must_use]
    pub const fn is_written(self) -> bool {
        matches!(self, Self::Written)
    }
}

/// Reason a mutation left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noop {
    /// No user record is stored yet.
    UserMissing,
    /// No trip has the requested id.
    MapNotFound {
        /// Requested trip id.
        map_id: u64,
    },
    /// No POI has the requested id.
    PoiNotFound {
        /// Requested POI id.
        poi_id: u64,
    },
    /// The POI is already attached to the trip.
    AlreadySaved {
        /// Trip id.
        map_id: u64,
        /// POI id.
        poi_id: u64,
    },
    /// The POI is not attached to the trip.
    NotSaved {
        /// Trip id.
        map_id: u64,
        /// POI id.
        poi_id: u64,
    },
}

impl fmt::Display for Noop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserMissing => f.write_str("no user record is stored"),
            Self::MapNotFound { map_id } => write!(f, "map {map_id} does not exist"),
            Self::PoiNotFound { poi_id } => write!(f, "POI {poi_id} does not exist"),
            Self::AlreadySaved { map_id, poi_id } => {
                write!(f, "POI {poi_id} is already saved in map {map_id}")
            }
            Self::NotSaved { map_id, poi_id } => {
                write!(f, "POI {poi_id} is not saved in map {map_id}")
            }
        }
    }
}
