//! Behaviour tests for cache-first venue fetching.

use std::cell::RefCell;
use std::time::Duration;

use camino::Utf8Path;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use siteline_core::PoiCategory;
use siteline_data::venues::test_support::{StubSearch, block_on_for_tests};
use siteline_data::{FetchReport, Venue, VenueCache, VenueSource};
use tempfile::TempDir;

#[derive(Debug)]
struct CacheWorld {
    dir: TempDir,
    stub: Option<StubSearch>,
    source: Option<VenueSource<StubSearch>>,
    report: Option<FetchReport>,
}

impl CacheWorld {
    fn cache(&self) -> VenueCache {
        VenueCache::new(Utf8Path::from_path(self.dir.path()).expect("utf-8 temp dir"))
    }

    fn fetch(&mut self, categories: &[PoiCategory]) {
        let stub = self.stub.take().expect("stub configured in a given step");
        let source = VenueSource::new(stub, self.cache()).with_request_interval(Duration::ZERO);
        self.report = Some(block_on_for_tests(
            source.fetch_all(categories.iter().copied()),
        ));
        self.source = Some(source);
    }

    fn report(&self) -> &FetchReport {
        self.report.as_ref().expect("fetch ran in a when step")
    }

    fn calls(&self) -> Vec<PoiCategory> {
        self.source
            .as_ref()
            .expect("fetch ran in a when step")
            .search()
            .calls()
    }
}

#[fixture]
fn world() -> RefCell<CacheWorld> {
    RefCell::new(CacheWorld {
        dir: TempDir::new().expect("create temp dir"),
        stub: None,
        source: None,
        report: None,
    })
}

fn bars() -> Vec<Venue> {
    vec![Venue::new("Zeitgeist", 37.7701, -122.4222)]
}

fn ferries() -> Vec<Venue> {
    vec![
        Venue::new("Ferry Building", 37.7955, -122.3937),
        Venue::new("Pier 41", 37.8087, -122.4098),
    ]
}

#[given("a venue cache already holding bars")]
fn given_cached_bars(#[from(world)] world: &RefCell<CacheWorld>) {
    let mut state = world.borrow_mut();
    state
        .cache()
        .store(PoiCategory::Bar, &bars())
        .expect("seed cache");
    state.stub = Some(StubSearch::new().with_venues(PoiCategory::Bar, Vec::new()));
}

#[given("an empty venue cache and an API returning ferries")]
fn given_api_ferries(#[from(world)] world: &RefCell<CacheWorld>) {
    world.borrow_mut().stub = Some(StubSearch::new().with_venues(PoiCategory::Ferry, ferries()));
}

#[given("an empty venue cache and an API that rejects airport searches")]
fn given_rejecting_api(#[from(world)] world: &RefCell<CacheWorld>) {
    world.borrow_mut().stub = Some(
        StubSearch::new()
            .with_failure(PoiCategory::Airport, 401)
            .with_venues(PoiCategory::Ferry, ferries()),
    );
}

#[when("I fetch bars")]
fn when_fetch_bars(#[from(world)] world: &RefCell<CacheWorld>) {
    world.borrow_mut().fetch(&[PoiCategory::Bar]);
}

#[when("I fetch ferries")]
fn when_fetch_ferries(#[from(world)] world: &RefCell<CacheWorld>) {
    world.borrow_mut().fetch(&[PoiCategory::Ferry]);
}

#[when("I fetch airports and ferries")]
fn when_fetch_both(#[from(world)] world: &RefCell<CacheWorld>) {
    world
        .borrow_mut()
        .fetch(&[PoiCategory::Airport, PoiCategory::Ferry]);
}

#[then("the bars come from the cache")]
fn then_bars_cached(#[from(world)] world: &RefCell<CacheWorld>) {
    let state = world.borrow();
    let fetch = state.report().categories.first().expect("bars fetched");
    assert!(fetch.from_cache);
    assert_eq!(fetch.venues, bars());
}

#[then("the venue API was not called")]
fn then_no_calls(#[from(world)] world: &RefCell<CacheWorld>) {
    assert!(world.borrow().calls().is_empty());
}

#[then("the ferries come from the API")]
fn then_ferries_fetched(#[from(world)] world: &RefCell<CacheWorld>) {
    let state = world.borrow();
    let fetch = state.report().categories.first().expect("ferries fetched");
    assert!(!fetch.from_cache);
    assert_eq!(state.calls(), [PoiCategory::Ferry]);
}

#[then("the cache now holds the ferries")]
fn then_ferries_cached(#[from(world)] world: &RefCell<CacheWorld>) {
    let cached = world
        .borrow()
        .cache()
        .load(PoiCategory::Ferry)
        .expect("load cache");
    assert_eq!(cached, Some(ferries()));
}

#[then("airports are reported as failed")]
fn then_airports_failed(#[from(world)] world: &RefCell<CacheWorld>) {
    let state = world.borrow();
    let failed: Vec<_> = state
        .report()
        .failures
        .iter()
        .map(|failure| failure.category)
        .collect();
    assert_eq!(failed, [PoiCategory::Airport]);
}

#[then("ferries are fetched")]
fn then_ferries_present(#[from(world)] world: &RefCell<CacheWorld>) {
    let state = world.borrow();
    let fetched: Vec<_> = state
        .report()
        .categories
        .iter()
        .map(|fetch| fetch.category)
        .collect();
    assert_eq!(fetched, [PoiCategory::Ferry]);
    assert_eq!(state.report().records().len(), 2);
}

#[then("nothing is cached for airports")]
fn then_airports_uncached(#[from(world)] world: &RefCell<CacheWorld>) {
    let cached = world
        .borrow()
        .cache()
        .load(PoiCategory::Airport)
        .expect("load cache");
    assert!(cached.is_none());
}

#[scenario(path = "tests/features/venue_cache.feature", index = 0)]
fn cached_category(world: RefCell<CacheWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/venue_cache.feature", index = 1)]
fn missing_category(world: RefCell<CacheWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/venue_cache.feature", index = 2)]
fn failing_category(world: RefCell<CacheWorld>) {
    let _ = world;
}
