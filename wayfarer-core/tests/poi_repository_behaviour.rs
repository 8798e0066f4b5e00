//! Behavioural coverage for the POI catalog repository.

use std::cell::RefCell;

use geo::{Coord, Rect};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::{MemoryStore, NewPoi, Noop, Planner, Poi, Seed, WriteOutcome};

#[derive(Default)]
struct PoiWorld {
    planner: RefCell<Option<Planner<MemoryStore>>>,
    created: RefCell<Option<Poi>>,
    deleted: RefCell<Option<WriteOutcome>>,
    matches: RefCell<Vec<Poi>>,
}

impl PoiWorld {
    fn with_planner<R>(&self, f: impl FnOnce(&Planner<MemoryStore>) -> R) -> R {
        let planner = self.planner.borrow();
        f(planner.as_ref().expect("planner is initialized"))
    }
}

#[fixture]
fn world() -> PoiWorld {
    PoiWorld::default()
}

#[given("an initialized planner")]
fn initialized_planner(world: &PoiWorld) {
    let planner = Planner::new(MemoryStore::default());
    let seed = Seed::bundled().expect("bundled seed parses");
    let report = planner.initialize(&seed).expect("initialize storage");
    assert!(report.seeded_pois);
    world.planner.replace(Some(planner));
}

#[when("I create a POI named {name:word}")]
fn create_poi(world: &PoiWorld, name: String) {
    let created = world.with_planner(|planner| {
        planner
            .pois()
            .create(NewPoi {
                name: Some(name),
                category: Some("food".into()),
                location: Some(Coord {
                    x: 12.4701,
                    y: 41.8986,
                }),
                ..NewPoi::default()
            })
            .expect("create POI")
    });
    world.created.replace(Some(created));
}

#[when("I delete POI {poi_id}")]
fn delete_poi(world: &PoiWorld, poi_id: u64) {
    let outcome = world.with_planner(|planner| planner.pois().delete(poi_id).expect("delete POI"));
    world.deleted.replace(Some(outcome));
}

#[when("I query the box around central Rome")]
fn query_central_rome(world: &PoiWorld) {
    let bbox = Rect::new(
        Coord {
            x: 12.475,
            y: 41.885,
        },
        Coord {
            x: 12.495,
            y: 41.905,
        },
    );
    let found = world.with_planner(|planner| planner.pois().in_bbox(&bbox).expect("query bbox"));
    world.matches.replace(found);
}

#[then("the created POI has id {poi_id}")]
fn created_id(world: &PoiWorld, poi_id: u64) {
    let created = world.created.borrow();
    let poi = created.as_ref().expect("a POI was created");
    assert_eq!(poi.id, poi_id);
    let stored = world.with_planner(|planner| planner.pois().get(poi_id).expect("lookup POI"));
    assert_eq!(stored.as_ref(), Some(poi));
}

#[then("the catalog holds {count} POIs")]
fn catalog_size(world: &PoiWorld, count: usize) {
    let pois = world.with_planner(|planner| planner.pois().all().expect("read catalog"));
    assert_eq!(pois.len(), count);
}

#[then("the delete reports POI {poi_id} missing")]
fn delete_missing(world: &PoiWorld, poi_id: u64) {
    assert_eq!(
        *world.deleted.borrow(),
        Some(WriteOutcome::Unchanged(Noop::PoiNotFound { poi_id }))
    );
}

#[then("the matches are POIs 1, 2, 5 and 6")]
fn central_matches(world: &PoiWorld) {
    let ids: Vec<u64> = world.matches.borrow().iter().map(|poi| poi.id).collect();
    assert_eq!(ids, vec![1, 2, 5, 6]);
}

#[scenario(path = "tests/features/poi_repository.feature", index = 0)]
fn created_pois_take_next_id(world: PoiWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/poi_repository.feature", index = 1)]
fn deleting_unknown_poi(world: PoiWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/poi_repository.feature", index = 2)]
fn bbox_query(world: PoiWorld) {
    let _ = world;
}
