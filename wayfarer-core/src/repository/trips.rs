use log::{debug, warn};

use super::{Noop, WriteOutcome};
use crate::ids::IdAllocator;
use crate::poi::non_blank;
use crate::store::{Change, JsonStore, KeyValueStore, StorageKey, StoreError};
use crate::trip::{DEFAULT_IMAGE_URL, MapEdit, NewMap, SavedPoiOptions, SavedPoiPatch};
use crate::{Poi, SavedPoi, TripMap, User};

const USER_KEY: &str = StorageKey::User.as_str();
const POI_KEY: &str = StorageKey::Poi.as_str();

/// Operations over the user's trips and the POIs saved on them.
#[derive(Debug)]
pub struct TripRepository<'s, S, A> {
    store: &'s JsonStore<S>,
    ids: &'s A,
}

impl<S, A> Clone for TripRepository<'_, S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for TripRepository<'_, S, A> {}

impl<'s, S: KeyValueStore, A: IdAllocator> TripRepository<'s, S, A> {
    /// Operate on the user record held by `store`, minting ad hoc POI ids
    /// from `ids`.
    #[must_use]
    pub const fn new(store: &'s JsonStore<S>, ids: &'s A) -> Self {
        Self { store, ids }
    }

    /// The stored user record.
    pub fn user(&self) -> Result<Option<User>, StoreError> {
        self.store.get(USER_KEY)
    }

    /// Look up a trip by id.
    pub fn map(&self, map_id: u64) -> Result<Option<TripMap>, StoreError> {
        Ok(self
            .user()?
            .and_then(|user| user.maps.into_iter().find(|map| map.id == map_id)))
    }

    /// The currently selected trip.
    pub fn selected_map(&self) -> Result<Option<TripMap>, StoreError> {
        Ok(self
            .user()?
            .and_then(|user| user.maps.into_iter().find(|map| map.selected)))
    }

    /// Make `map_id` the only selected trip.
    pub fn select_map(&self, map_id: u64) -> Result<WriteOutcome, StoreError> {
        let outcome = self.with_user(|user| {
            if user.map(map_id).is_none() {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            }
            for map in &mut user.maps {
                map.selected = map.id == map_id;
            }
            Change::Persist(WriteOutcome::Written)
        })?;
        report("select map", outcome);
        Ok(outcome)
    }

    /// Append a new, unselected trip with no saved POIs.
    ///
    /// Returns `None` when no user record is stored.
    pub fn add_map(&self, request: NewMap) -> Result<Option<TripMap>, StoreError> {
        let created = self.store.modify(USER_KEY, |user: &mut User| {
            let map = TripMap {
                id: user.next_map_id(),
                name: request.name,
                image_url: non_blank(request.image_url)
                    .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_owned()),
                starting_date: request.starting_date,
                leaving_date: request.leaving_date,
                selected: false,
                saved_poi: Vec::new(),
            };
            user.maps.push(map.clone());
            Change::Persist(map)
        })?;
        if created.is_none() {
            warn!("cannot add map: {}", Noop::UserMissing);
        }
        Ok(created)
    }

    /// Remove a trip. When it was selected, the first remaining trip becomes
    /// selected.
    pub fn delete_map(&self, map_id: u64) -> Result<WriteOutcome, StoreError> {
        let outcome = self.with_user(|user| {
            let Some(index) = user.maps.iter().position(|map| map.id == map_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            };
            let removed = user.maps.remove(index);
            if removed.selected
                && let Some(first) = user.maps.first_mut()
            {
                first.selected = true;
            }
            Change::Persist(WriteOutcome::Written)
        })?;
        report("delete map", outcome);
        Ok(outcome)
    }

    /// Replace a trip's name and dates, and its cover image when one is
    /// given. The id, selection and saved POIs are kept.
    pub fn update_map(&self, map_id: u64, edit: MapEdit) -> Result<WriteOutcome, StoreError> {
        let outcome = self.with_user(|user| {
            let Some(map) = user.map_mut(map_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            };
            map.name = edit.name;
            map.starting_date = edit.starting_date;
            map.leaving_date = edit.leaving_date;
            if let Some(image_url) = non_blank(edit.image_url) {
                map.image_url = image_url;
            }
            Change::Persist(WriteOutcome::Written)
        })?;
        report("update map", outcome);
        Ok(outcome)
    }

    /// Attach catalog POI `poi_id` to a trip with the given planning data.
    ///
    /// Adding a POI that is already attached is a successful no-op.
    pub fn add_poi_to_map(
        &self,
        map_id: u64,
        poi_id: u64,
        options: SavedPoiOptions,
    ) -> Result<WriteOutcome, StoreError> {
        let catalog: Vec<Poi> = self.store.get(POI_KEY)?.unwrap_or_default();
        let outcome = self.with_user(|user| {
            let Some(map) = user.map_mut(map_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            };
            if map.contains(poi_id) {
                return Change::Keep(WriteOutcome::Unchanged(Noop::AlreadySaved {
                    map_id,
                    poi_id,
                }));
            }
            let Some(poi) = catalog.iter().find(|poi| poi.id == poi_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::PoiNotFound { poi_id }));
            };
            map.saved_poi.push(SavedPoi::from_catalog(poi, options));
            Change::Persist(WriteOutcome::Written)
        })?;
        report("add POI to map", outcome);
        Ok(outcome)
    }

    /// Detach a POI from a trip, writing only when it was attached.
    pub fn remove_poi_from_map(
        &self,
        map_id: u64,
        poi_id: u64,
    ) -> Result<WriteOutcome, StoreError> {
        let outcome = self.with_user(|user| {
            let Some(map) = user.map_mut(map_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            };
            let before = map.saved_poi.len();
            map.saved_poi.retain(|poi| poi.id != poi_id);
            if map.saved_poi.len() == before {
                Change::Keep(WriteOutcome::Unchanged(Noop::NotSaved { map_id, poi_id }))
            } else {
                Change::Persist(WriteOutcome::Written)
            }
        })?;
        report("remove POI from map", outcome);
        Ok(outcome)
    }

    /// Merge `patch` into the saved entry with id `patch.id`.
    pub fn update_poi_in_map(
        &self,
        map_id: u64,
        patch: SavedPoiPatch,
    ) -> Result<WriteOutcome, StoreError> {
        let poi_id = patch.id;
        let outcome = self.with_user(|user| {
            let Some(map) = user.map_mut(map_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
            };
            let Some(saved) = map.saved_poi.iter_mut().find(|poi| poi.id == poi_id) else {
                return Change::Keep(WriteOutcome::Unchanged(Noop::NotSaved { map_id, poi_id }));
            };
            saved.apply(patch);
            Change::Persist(WriteOutcome::Written)
        })?;
        report("update POI in map", outcome);
        Ok(outcome)
    }

    /// Whether `poi_id` is attached to trip `map_id`.
    pub fn is_poi_saved(&self, map_id: u64, poi_id: u64) -> Result<bool, StoreError> {
        Ok(self
            .user()?
            .and_then(|user| user.map(map_id).map(|map| map.contains(poi_id)))
            .unwrap_or(false))
    }

    /// Attach a POI that has no catalog entry. `draft.id` is replaced with a
    /// freshly minted id, which is returned with the stored entry.
    ///
    /// Returns `None` when the user or the trip does not exist.
    pub fn create_poi_in_map(
        &self,
        map_id: u64,
        draft: SavedPoi,
    ) -> Result<Option<SavedPoi>, StoreError> {
        let ids = self.ids;
        let created = self
            .store
            .modify(USER_KEY, |user: &mut User| {
                let Some(map) = user.map_mut(map_id) else {
                    return Change::Keep(None);
                };
                let mut id = ids.next_id();
                while map.contains(id) {
                    id = ids.next_id();
                }
                let saved = SavedPoi { id, ..draft };
                map.saved_poi.push(saved.clone());
                Change::Persist(Some(saved))
            })?
            .flatten();
        if created.is_none() {
            warn!("cannot create POI in map {map_id}: map or user record missing");
        }
        Ok(created)
    }

    fn with_user<F>(&self, f: F) -> Result<WriteOutcome, StoreError>
    where
        F: FnOnce(&mut User) -> Change<WriteOutcome>,
    {
        Ok(self
            .store
            .modify(USER_KEY, f)?
            .unwrap_or(WriteOutcome::Unchanged(Noop::UserMissing)))
    }
}

fn report(operation: &str, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Written => {}
        WriteOutcome::Unchanged(reason @ Noop::AlreadySaved { .. }) => {
            debug!("skipped {operation}: {reason}");
        }
        WriteOutcome::Unchanged(reason) => warn!("cannot {operation}: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingStore, SequentialIds};
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use rstest::{fixture, rstest};
    use std::sync::{Mutex, Once};

    static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

    struct CapturingLogger;

    impl Log for CapturingLogger {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            if let Ok(mut lines) = CAPTURED.lock() {
                lines.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger;

    fn capture_logs() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(LevelFilter::Debug);
            }
        });
    }

    fn logged(level: Level, message: &str) -> bool {
        CAPTURED
            .lock()
            .expect("log capture lock")
            .iter()
            .any(|(seen, line)| *seen == level && line == message)
    }

    struct TripWorld {
        store: JsonStore<RecordingStore>,
        ids: SequentialIds,
    }

    impl TripWorld {
        fn repo(&self) -> TripRepository<'_, RecordingStore, SequentialIds> {
            TripRepository::new(&self.store, &self.ids)
        }

        fn selected_ids(&self) -> Vec<u64> {
            self.repo()
                .user()
                .expect("read user")
                .map(|user| {
                    user.maps
                        .iter()
                        .filter(|map| map.selected)
                        .map(|map| map.id)
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn trip(id: u64, selected: bool) -> TripMap {
        TripMap {
            id,
            name: format!("Trip {id}"),
            image_url: DEFAULT_IMAGE_URL.to_owned(),
            starting_date: "2025-06-01".into(),
            leaving_date: "2025-06-07".into(),
            selected,
            saved_poi: Vec::new(),
        }
    }

    #[fixture]
    fn world() -> TripWorld {
        let store = JsonStore::new(RecordingStore::default());
        store
            .set(
                USER_KEY,
                &User {
                    maps: vec![trip(1, true), trip(3, false)],
                },
            )
            .expect("seed user");
        store
            .set(
                POI_KEY,
                &[
                    Poi::new(10, "Colosseum", "Piazza del Colosseo"),
                    Poi::new(11, "Pantheon", "Piazza della Rotonda"),
                ],
            )
            .expect("seed catalog");
        TripWorld {
            store,
            ids: SequentialIds::starting_at(1_000),
        }
    }

    #[rstest]
    fn add_map_uses_max_plus_one(world: TripWorld) {
        let created = world
            .repo()
            .add_map(NewMap {
                name: "Lisbon".into(),
                ..NewMap::default()
            })
            .expect("add map")
            .expect("user exists");
        assert_eq!(created.id, 4);
        assert!(!created.selected);
        assert!(created.saved_poi.is_empty());
        assert_eq!(created.image_url, DEFAULT_IMAGE_URL);
    }

    #[rstest]
    fn add_map_without_user_returns_none() {
        let store = JsonStore::new(RecordingStore::default());
        let ids = SequentialIds::default();
        let created = TripRepository::new(&store, &ids)
            .add_map(NewMap::default())
            .expect("add map");
        assert!(created.is_none());
        assert_eq!(store.backend().writes(), 0);
    }

    #[rstest]
    fn select_map_leaves_exactly_one_selected(world: TripWorld) {
        assert!(world.repo().select_map(3).expect("select").is_written());
        assert_eq!(world.selected_ids(), vec![3]);
        assert!(world.repo().select_map(1).expect("select").is_written());
        assert_eq!(world.selected_ids(), vec![1]);
    }

    #[rstest]
    fn select_unknown_map_changes_nothing(world: TripWorld) {
        let writes = world.store.backend().writes();
        let outcome = world.repo().select_map(42).expect("select");
        assert_eq!(outcome, WriteOutcome::Unchanged(Noop::MapNotFound { map_id: 42 }));
        assert_eq!(world.store.backend().writes(), writes);
        assert_eq!(world.selected_ids(), vec![1]);
    }

    #[rstest]
    fn deleting_selected_map_promotes_first_remaining(world: TripWorld) {
        assert!(world.repo().delete_map(1).expect("delete").is_written());
        assert_eq!(world.selected_ids(), vec![3]);
        assert!(world.repo().delete_map(3).expect("delete").is_written());
        let user = world.repo().user().expect("read").expect("user exists");
        assert!(user.maps.is_empty());
    }

    #[rstest]
    fn deleting_unselected_map_keeps_selection(world: TripWorld) {
        assert!(world.repo().delete_map(3).expect("delete").is_written());
        assert_eq!(world.selected_ids(), vec![1]);
    }

    #[rstest]
    fn update_map_keeps_id_and_image_when_absent(world: TripWorld) {
        let outcome = world
            .repo()
            .update_map(
                3,
                MapEdit {
                    name: "Rome again".into(),
                    starting_date: "2026-01-01".into(),
                    leaving_date: "2026-01-05".into(),
                    image_url: None,
                },
            )
            .expect("update");
        assert!(outcome.is_written());
        let map = world.repo().map(3).expect("read").expect("map exists");
        assert_eq!(map.name, "Rome again");
        assert_eq!(map.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(map.leaving_date, "2026-01-05");
    }

    #[rstest]
    fn add_poi_twice_keeps_one_entry(world: TripWorld) {
        let repo = world.repo();
        let first = repo
            .add_poi_to_map(1, 10, SavedPoiOptions::default())
            .expect("first add");
        let second = repo
            .add_poi_to_map(1, 10, SavedPoiOptions::default())
            .expect("second add");
        assert!(first.is_written());
        assert_eq!(
            second,
            WriteOutcome::Unchanged(Noop::AlreadySaved { map_id: 1, poi_id: 10 })
        );
        let map = repo.map(1).expect("read").expect("map exists");
        assert_eq!(map.saved_poi.len(), 1);
        let saved = map.saved(10).expect("saved entry");
        assert_eq!(saved.color, "gray");
        assert_eq!(saved.name.as_deref(), Some("Colosseum"));
    }

    #[rstest]
    fn add_unknown_poi_is_a_noop(world: TripWorld) {
        let outcome = world
            .repo()
            .add_poi_to_map(1, 99, SavedPoiOptions::default())
            .expect("add");
        assert_eq!(outcome, WriteOutcome::Unchanged(Noop::PoiNotFound { poi_id: 99 }));
    }

    #[derive(Debug, Clone, Copy)]
    enum SavedWrite {
        Add,
        Remove,
        Update,
    }

    #[rstest]
    #[case(SavedWrite::Add, 71, "cannot add POI to map: map 71 does not exist")]
    #[case(SavedWrite::Remove, 72, "cannot remove POI from map: map 72 does not exist")]
    #[case(SavedWrite::Update, 73, "cannot update POI in map: map 73 does not exist")]
    fn saved_poi_writes_to_missing_map_warn_and_skip_write(
        world: TripWorld,
        #[case] operation: SavedWrite,
        #[case] map_id: u64,
        #[case] warning: &str,
    ) {
        capture_logs();
        let repo = world.repo();
        let writes = world.store.backend().writes();
        let outcome = match operation {
            SavedWrite::Add => repo.add_poi_to_map(map_id, 10, SavedPoiOptions::default()),
            SavedWrite::Remove => repo.remove_poi_from_map(map_id, 10),
            SavedWrite::Update => repo.update_poi_in_map(
                map_id,
                SavedPoiPatch {
                    id: 10,
                    icon: Some("museum".into()),
                    ..SavedPoiPatch::default()
                },
            ),
        }
        .expect("saved POI write");
        assert_eq!(outcome, WriteOutcome::Unchanged(Noop::MapNotFound { map_id }));
        assert_eq!(world.store.backend().writes(), writes);
        assert!(logged(Level::Warn, warning), "missing warning {warning:?}");
    }

    #[rstest]
    fn adding_a_saved_poi_again_is_not_a_warning(world: TripWorld) {
        capture_logs();
        let repo = world.repo();
        assert!(
            repo.add_poi_to_map(3, 11, SavedPoiOptions::default())
                .expect("first add")
                .is_written()
        );
        let again = repo
            .add_poi_to_map(3, 11, SavedPoiOptions::default())
            .expect("second add");
        assert!(!again.is_written());
        assert!(logged(
            Level::Debug,
            "skipped add POI to map: POI 11 is already saved in map 3"
        ));
        assert!(!logged(
            Level::Warn,
            "cannot add POI to map: POI 11 is already saved in map 3"
        ));
    }

    #[rstest]
    fn removing_non_member_skips_write(world: TripWorld) {
        let writes = world.store.backend().writes();
        let before = world.store.backend().raw(USER_KEY);
        let outcome = world.repo().remove_poi_from_map(1, 11).expect("remove");
        assert!(!outcome.is_written());
        assert_eq!(world.store.backend().writes(), writes);
        assert_eq!(world.store.backend().raw(USER_KEY), before);
    }

    #[rstest]
    fn update_poi_merges_fields(world: TripWorld) {
        let repo = world.repo();
        assert!(
            repo.add_poi_to_map(1, 11, SavedPoiOptions::default())
                .expect("add")
                .is_written()
        );
        let outcome = repo
            .update_poi_in_map(
                1,
                SavedPoiPatch {
                    id: 11,
                    must_have: Some(true),
                    layer: Some("Day 2".into()),
                    ..SavedPoiPatch::default()
                },
            )
            .expect("update");
        assert!(outcome.is_written());
        let map = repo.map(1).expect("read").expect("map exists");
        let saved = map.saved(11).expect("saved entry");
        assert!(saved.must_have);
        assert_eq!(saved.layer, "Day 2");
        assert_eq!(saved.name.as_deref(), Some("Pantheon"));
    }

    #[rstest]
    #[case(1, 10, true)]
    #[case(1, 11, false)]
    #[case(3, 10, false)]
    #[case(7, 10, false)]
    fn is_poi_saved_reflects_membership(
        world: TripWorld,
        #[case] map_id: u64,
        #[case] poi_id: u64,
        #[case] expected: bool,
    ) {
        assert!(
            world
                .repo()
                .add_poi_to_map(1, 10, SavedPoiOptions::default())
                .expect("add")
                .is_written()
        );
        assert_eq!(
            world.repo().is_poi_saved(map_id, poi_id).expect("check"),
            expected
        );
    }

    #[rstest]
    fn create_poi_in_map_mints_fresh_ids(world: TripWorld) {
        let repo = world.repo();
        let mut draft = SavedPoi::new(0);
        draft.name = Some("Hidden trattoria".into());
        let first = repo
            .create_poi_in_map(3, draft.clone())
            .expect("create")
            .expect("map exists");
        let second = repo
            .create_poi_in_map(3, draft)
            .expect("create")
            .expect("map exists");
        assert_eq!(first.id, 1_000);
        assert_eq!(second.id, 1_001);
        let map = repo.map(3).expect("read").expect("map exists");
        assert_eq!(map.saved_poi.len(), 2);
        let minted = map.saved(1_000).expect("minted entry");
        assert_eq!(minted.name.as_deref(), Some("Hidden trattoria"));
    }

    #[rstest]
    fn create_poi_in_unknown_map_returns_none(world: TripWorld) {
        let created = world
            .repo()
            .create_poi_in_map(8, SavedPoi::new(0))
            .expect("create");
        assert!(created.is_none());
    }
}
