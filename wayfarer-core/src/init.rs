//! Seeding the store with the bundled datasets.
//!
//! Initialization is idempotent and runs before any repository call. The
//! catalog and the user record are each written only when their key is
//! absent. Saved POIs are then projected against the catalog so every entry
//! carries the catalog detail it lacks (see [`SavedPoi::project_from`]).

use log::debug;
use thiserror::Error;

use crate::store::{Change, JsonStore, KeyValueStore, StorageKey, StoreError};
use crate::{Poi, SavedPoi, User};

const BUNDLED_POIS: &str = include_str!("../data/poi.json");
const BUNDLED_USER: &str = include_str!("../data/user.json");

/// Error raised when seed datasets cannot be parsed.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The POI dataset was not a JSON array of POIs.
    #[error("failed to parse POI seed data: {0}")]
    Pois(#[source] serde_json::Error),
    /// The user dataset was not a JSON user record.
    #[error("failed to parse user seed data: {0}")]
    User(#[source] serde_json::Error),
}

/// Default datasets written into an empty store.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    /// Default POI catalog.
    pub pois: Vec<Poi>,
    /// Default user record.
    pub user: User,
}

impl Seed {
    /// The datasets shipped with the crate.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::Seed;
    ///
    /// let seed = Seed::bundled().expect("bundled data parses");
    /// assert!(!seed.pois.is_empty());
    /// assert!(seed.user.selected().is_some());
    /// ```
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_POIS, BUNDLED_USER)
    }

    /// Parse caller-supplied datasets.
    pub fn from_json(pois: &str, user: &str) -> Result<Self, SeedError> {
        Ok(Self {
            pois: serde_json::from_str(pois).map_err(SeedError::Pois)?,
            user: serde_json::from_str(user).map_err(SeedError::User)?,
        })
    }

    /// Copy of the seed user with every saved POI projected against the seed
    /// catalog.
    #[must_use]
    pub fn projected_user(&self) -> User {
        let mut user = self.user.clone();
        project_user(&mut user, &self.pois);
        user
    }
}

/// What [`initialize`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    /// The catalog key was absent and has been seeded.
    pub seeded_pois: bool,
    /// The user key was absent and has been seeded.
    pub seeded_user: bool,
    /// Saved entries in an existing user record that gained catalog detail.
    pub enriched: usize,
}

/// Ensure both keys are populated and saved POIs carry catalog detail.
///
/// Existing values are never replaced by the seed. The stored user record is
/// rewritten only when projection filled in at least one field.
pub fn initialize<S: KeyValueStore>(
    store: &JsonStore<S>,
    seed: &Seed,
) -> Result<InitReport, StoreError> {
    let seeded_pois = store.init_if_absent(StorageKey::Poi.as_str(), &seed.pois)?;
    let seeded_user = store.init_if_absent(StorageKey::User.as_str(), &seed.projected_user())?;

    let catalog: Vec<Poi> = store.get(StorageKey::Poi.as_str())?.unwrap_or_default();
    let enriched = store
        .modify(StorageKey::User.as_str(), |user: &mut User| {
            let enriched = project_user(user, &catalog);
            if enriched == 0 {
                Change::Keep(enriched)
            } else {
                Change::Persist(enriched)
            }
        })?
        .unwrap_or(0);

    debug!(
        "storage initialized (seeded pois: {seeded_pois}, seeded user: {seeded_user}, enriched: {enriched})"
    );
    Ok(InitReport {
        seeded_pois,
        seeded_user,
        enriched,
    })
}

/// Project every saved entry of `user` against `catalog`, returning how many
/// entries changed.
fn project_user(user: &mut User, catalog: &[Poi]) -> usize {
    user.maps
        .iter_mut()
        .flat_map(|map| map.saved_poi.iter_mut())
        .map(|saved| project_entry(saved, catalog))
        .filter(|changed| *changed)
        .count()
}

fn project_entry(saved: &mut SavedPoi, catalog: &[Poi]) -> bool {
    catalog
        .iter()
        .find(|poi| poi.id == saved.id)
        .is_some_and(|poi| saved.project_from(poi))
}
