//! Behaviour-driven step definitions driving the fetch CLI scenarios.

use super::fetch_unit::StubSearchBuilder;
use super::helpers::Workspace;
use super::*;
use crate::fetch::FetchSummary;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use siteline_core::PoiCategory;
use siteline_data::Venue;
use std::cell::RefCell;

struct FetchWorld {
    workspace: Workspace,
    include_token: RefCell<bool>,
    builder: RefCell<StubSearchBuilder>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl FetchWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            include_token: RefCell::new(true),
            builder: RefCell::new(StubSearchBuilder::default()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, categories: &[&str]) {
        let mut argv = vec![
            "siteline".to_owned(),
            "fetch".to_owned(),
            format!("--{ARG_CACHE_DIR}"),
            self.workspace.cache_dir().into_string(),
            "--request-interval-ms".to_owned(),
            "0".to_owned(),
        ];
        if *self.include_token.borrow() {
            argv.extend([format!("--{ARG_TOKEN}"), "secret".to_owned()]);
        }
        for category in categories {
            argv.extend([format!("--{ARG_CATEGORY}"), (*category).to_owned()]);
        }

        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Fetch(args) => {
                let builder = self.builder.borrow();
                let mut buffer = self.stdout.borrow_mut();
                fetch::run_fetch_with(args, &*builder, &mut *buffer)
            }
            Command::Rank(_) => panic!("expected fetch command"),
        });
        self.result.replace(Some(outcome));
    }

    fn summary(&self) -> FetchSummary {
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be a JSON summary")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> FetchWorld {
    FetchWorld::new()
}

#[given("the venue cache already holds Starbucks venues")]
fn cached_starbucks(#[from(world)] world: &FetchWorld) {
    world.workspace.seed_starbucks();
}

#[given("the venue API returns ferries")]
fn api_returns_ferries(#[from(world)] world: &FetchWorld) {
    world.builder.borrow_mut().venues.push((
        PoiCategory::Ferry,
        vec![
            Venue::new("Ferry Building", 37.7955, -122.3937),
            Venue::new("Pier 41", 37.8087, -122.4098),
        ],
    ));
}

#[given("the venue API rejects airport searches")]
fn api_rejects_airports(#[from(world)] world: &FetchWorld) {
    world
        .builder
        .borrow_mut()
        .failures
        .push((PoiCategory::Airport, 401));
}

#[given("I omit the API token")]
fn omit_token(#[from(world)] world: &FetchWorld) {
    *world.include_token.borrow_mut() = false;
}

#[when("I fetch Starbucks and ferries")]
fn fetch_starbucks_and_ferries(#[from(world)] world: &FetchWorld) {
    world.run(&["starbucks", "ferry"]);
}

#[when("I fetch airports and schools")]
fn fetch_airports_and_schools(#[from(world)] world: &FetchWorld) {
    world.run(&["airport", "school"]);
}

#[then("the command succeeds and prints a JSON summary")]
fn command_succeeds(#[from(world)] world: &FetchWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
    assert!(world.summary().failed.is_empty());
}

#[then("Starbucks venues come from the cache")]
fn starbucks_from_cache(#[from(world)] world: &FetchWorld) {
    let summary = world.summary();
    let entry = summary
        .fetched
        .iter()
        .find(|entry| entry.category == PoiCategory::Starbucks)
        .expect("starbucks fetched");
    assert!(entry.from_cache);
}

#[then("the ferries are now cached")]
fn ferries_cached(#[from(world)] world: &FetchWorld) {
    let cached = world
        .workspace
        .cache()
        .load(PoiCategory::Ferry)
        .expect("cache readable")
        .expect("ferries cached");
    assert_eq!(cached.len(), 2);
}

#[then("the command fails because one category could not be fetched")]
fn fails_incomplete(#[from(world)] world: &FetchWorld) {
    match &*world.error() {
        CliError::FetchIncomplete { failed, total } => {
            assert_eq!(*failed, 1);
            assert_eq!(*total, 2);
        }
        other => panic!("expected FetchIncomplete, found {other:?}"),
    }
}

#[then("the summary lists airports as failed")]
fn summary_lists_airports(#[from(world)] world: &FetchWorld) {
    let summary = world.summary();
    let failed: Vec<_> = summary.failed.iter().map(|entry| entry.category).collect();
    assert_eq!(failed, [PoiCategory::Airport]);
}

#[then("the command fails because the API token is missing")]
fn fails_missing_token(#[from(world)] world: &FetchWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_TOKEN);
            assert_eq!(*env, ENV_TOKEN);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_fetch_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/fetch_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: FetchWorld) {
            let _ = world;
        }
    };
}

register_fetch_scenario!(fetch_missing_categories, "fetching categories missing from the cache");
register_fetch_scenario!(fetch_rejected_category, "reporting categories the API rejects");
register_fetch_scenario!(fetch_missing_token, "rejecting runs without an API token");
