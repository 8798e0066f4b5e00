//! Behavioural coverage for trip and saved-POI management.

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::test_support::{RecordingStore, SequentialIds};
use wayfarer_core::{
    DEFAULT_IMAGE_URL, NewMap, Planner, Poi, SavedPoi, SavedPoiOptions, StorageKey, TripMap,
    User, WriteOutcome,
};

/// Shared state for trip scenarios.
struct TripsWorld {
    planner: Planner<RecordingStore, SequentialIds>,
    created_map: RefCell<Option<TripMap>>,
    last_outcome: RefCell<Option<WriteOutcome>>,
    writes_before: Cell<usize>,
    raw_before: RefCell<Option<String>>,
}

impl TripsWorld {
    fn user(&self) -> User {
        self.planner
            .trips()
            .user()
            .expect("read user")
            .expect("user is stored")
    }

    fn map(&self, map_id: u64) -> TripMap {
        self.planner
            .trips()
            .map(map_id)
            .expect("read map")
            .unwrap_or_else(|| panic!("map {map_id} exists"))
    }

    fn snapshot(&self) {
        let backend = self.planner.store().backend();
        self.writes_before.set(backend.writes());
        self.raw_before
            .replace(backend.raw(StorageKey::User.as_str()));
    }
}

#[fixture]
fn world() -> TripsWorld {
    TripsWorld {
        planner: Planner::with_ids(RecordingStore::default(), SequentialIds::starting_at(5_000)),
        created_map: RefCell::new(None),
        last_outcome: RefCell::new(None),
        writes_before: Cell::new(0),
        raw_before: RefCell::new(None),
    }
}

fn trip(id: u64, selected: bool) -> TripMap {
    TripMap {
        id,
        name: format!("Trip {id}"),
        image_url: DEFAULT_IMAGE_URL.to_owned(),
        starting_date: "2025-09-01".into(),
        leaving_date: "2025-09-04".into(),
        selected,
        saved_poi: Vec::new(),
    }
}

#[given("a user with maps 1 and 3")]
#[expect(
    clippy::expect_used,
    reason = "scenario setup should fail fast when seeding the store fails"
)]
fn user_with_two_maps(world: &TripsWorld) {
    let store = world.planner.store();
    store
        .set(
            StorageKey::User.as_str(),
            &User {
                maps: vec![trip(1, true), trip(3, false)],
            },
        )
        .expect("seed user");
    store
        .set(
            StorageKey::Poi.as_str(),
            &[
                Poi::new(10, "Castel Sant'Angelo", "Lungotevere Castello 50"),
                Poi::new(11, "Bocca della Verità", "Piazza della Bocca della Verità 18"),
            ],
        )
        .expect("seed catalog");
}

#[when("I add a map named {name:word}")]
fn add_map(world: &TripsWorld, name: String) {
    let created = world
        .planner
        .trips()
        .add_map(NewMap {
            name,
            ..NewMap::default()
        })
        .expect("add map");
    world.created_map.replace(created);
}

#[when("I select map {map_id}")]
fn select_map(world: &TripsWorld, map_id: u64) {
    let outcome = world.planner.trips().select_map(map_id).expect("select map");
    world.last_outcome.replace(Some(outcome));
}

#[when("I delete map {map_id}")]
fn delete_map(world: &TripsWorld, map_id: u64) {
    let outcome = world.planner.trips().delete_map(map_id).expect("delete map");
    world.last_outcome.replace(Some(outcome));
}

#[when("I add POI {poi_id} to map {map_id}")]
fn add_poi(world: &TripsWorld, poi_id: u64, map_id: u64) {
    let outcome = world
        .planner
        .trips()
        .add_poi_to_map(map_id, poi_id, SavedPoiOptions::default())
        .expect("add POI to map");
    world.last_outcome.replace(Some(outcome));
}

#[when("I remove POI {poi_id} from map {map_id}")]
fn remove_poi(world: &TripsWorld, poi_id: u64, map_id: u64) {
    world.snapshot();
    let outcome = world
        .planner
        .trips()
        .remove_poi_from_map(map_id, poi_id)
        .expect("remove POI from map");
    world.last_outcome.replace(Some(outcome));
}

#[when("I create a POI named {name:word} in map {map_id}")]
fn create_poi(world: &TripsWorld, name: String, map_id: u64) {
    let mut draft = SavedPoi::new(0);
    draft.name = Some(name);
    let created = world
        .planner
        .trips()
        .create_poi_in_map(map_id, draft)
        .expect("create POI in map");
    assert!(created.is_some(), "map {map_id} accepts new POIs");
}

#[then("the new map has id {map_id}")]
fn new_map_id(world: &TripsWorld, map_id: u64) {
    let created = world.created_map.borrow();
    let map = created.as_ref().expect("a map was created");
    assert_eq!(map.id, map_id);
    assert_eq!(world.map(map_id).name, map.name);
}

#[then("the new map is not selected")]
fn new_map_unselected(world: &TripsWorld) {
    let created = world.created_map.borrow();
    let map = created.as_ref().expect("a map was created");
    assert!(!map.selected);
    assert!(map.saved_poi.is_empty());
    assert_eq!(map.image_url, DEFAULT_IMAGE_URL);
}

#[then("only map {map_id} is selected")]
fn only_selected(world: &TripsWorld, map_id: u64) {
    let selected: Vec<u64> = world
        .user()
        .maps
        .iter()
        .filter(|map| map.selected)
        .map(|map| map.id)
        .collect();
    assert_eq!(selected, vec![map_id]);
}

#[then("map {map_id} holds POI {poi_id} exactly once")]
fn holds_once(world: &TripsWorld, map_id: u64, poi_id: u64) {
    let map = world.map(map_id);
    let count = map.saved_poi.iter().filter(|poi| poi.id == poi_id).count();
    assert_eq!(count, 1);
}

#[then("the store was not written")]
fn store_untouched(world: &TripsWorld) {
    let backend = world.planner.store().backend();
    assert_eq!(backend.writes(), world.writes_before.get());
    assert_eq!(
        backend.raw(StorageKey::User.as_str()),
        *world.raw_before.borrow()
    );
    let outcome = world.last_outcome.borrow();
    assert!(outcome.is_some_and(|outcome| !outcome.is_written()));
}

#[then("POI {poi_id} is saved in map {map_id}")]
fn is_saved(world: &TripsWorld, poi_id: u64, map_id: u64) {
    assert!(world
        .planner
        .trips()
        .is_poi_saved(map_id, poi_id)
        .expect("check membership"));
}

#[then("POI {poi_id} is not saved in map {map_id}")]
fn is_not_saved(world: &TripsWorld, poi_id: u64, map_id: u64) {
    assert!(!world
        .planner
        .trips()
        .is_poi_saved(map_id, poi_id)
        .expect("check membership"));
}

#[then("map {map_id} holds a POI with id {poi_id}")]
fn holds_minted(world: &TripsWorld, map_id: u64, poi_id: u64) {
    let map = world.map(map_id);
    let saved = map.saved(poi_id).expect("minted entry is stored");
    assert_eq!(saved.name.as_deref(), Some("Trattoria"));
}

#[scenario(path = "tests/features/trips.feature", index = 0)]
fn adding_a_map(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 1)]
fn selecting_maps(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 2)]
fn deleting_selected_map(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 3)]
fn adding_poi_twice(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 4)]
fn removing_non_member(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 5)]
fn membership_tracking(world: TripsWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trips.feature", index = 6)]
fn creating_ad_hoc_poi(world: TripsWorld) {
    let _ = world;
}
