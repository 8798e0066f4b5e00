use geo::{Intersects, Rect};
use log::warn;

use super::{Noop, WriteOutcome};
use crate::store::{Change, JsonStore, KeyValueStore, StorageKey, StoreError};
use crate::trip::next_id;
use crate::{NewPoi, Poi};

const KEY: &str = StorageKey::Poi.as_str();

/// Operations over the POI catalog.
#[derive(Debug)]
pub struct PoiRepository<'s, S> {
    store: &'s JsonStore<S>,
}

impl<S> Clone for PoiRepository<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for PoiRepository<'_, S> {}

impl<'s, S: KeyValueStore> PoiRepository<'s, S> {
    /// Operate on the catalog held by `store`.
    #[must_use]
    pub const fn new(store: &'s JsonStore<S>) -> Self {
        Self { store }
    }

    /// The whole catalog in storage order; empty when uninitialized.
    pub fn all(&self) -> Result<Vec<Poi>, StoreError> {
        Ok(self.store.get(KEY)?.unwrap_or_default())
    }

    /// Look up a POI by id.
    pub fn get(&self, id: u64) -> Result<Option<Poi>, StoreError> {
        Ok(self.all()?.into_iter().find(|poi| poi.id == id))
    }

    /// POIs located inside `bbox`, boundary included, ordered by id.
    ///
    /// Coordinates use WGS84 with `x = longitude` and `y = latitude`. POIs
    /// without a location never match.
    pub fn in_bbox(&self, bbox: &Rect<f64>) -> Result<Vec<Poi>, StoreError> {
        let mut found: Vec<Poi> = self
            .all()?
            .into_iter()
            .filter(|poi| poi.location.is_some_and(|location| bbox.intersects(&location)))
            .collect();
        found.sort_unstable_by_key(|poi| poi.id);
        Ok(found)
    }

    /// Append a new POI with the next free id and return it.
    pub fn create(&self, request: NewPoi) -> Result<Poi, StoreError> {
        self.store.modify_or_default(KEY, |pois: &mut Vec<Poi>| {
            let poi = request.into_poi(next_id(pois.iter().map(|poi| poi.id)));
            pois.push(poi.clone());
            Change::Persist(poi)
        })
    }

    /// Remove the POI with `id`, writing only when one was removed.
    pub fn delete(&self, id: u64) -> Result<WriteOutcome, StoreError> {
        let outcome = self
            .store
            .modify(KEY, |pois: &mut Vec<Poi>| {
                let before = pois.len();
                pois.retain(|poi| poi.id != id);
                if pois.len() == before {
                    Change::Keep(WriteOutcome::Unchanged(Noop::PoiNotFound { poi_id: id }))
                } else {
                    Change::Persist(WriteOutcome::Written)
                }
            })?
            .unwrap_or(WriteOutcome::Unchanged(Noop::PoiNotFound { poi_id: id }));
        if let WriteOutcome::Unchanged(reason) = outcome {
            warn!("cannot delete POI {id}: {reason}");
        }
        Ok(outcome)
    }
}
