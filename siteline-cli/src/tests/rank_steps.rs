//! Behaviour-driven step definitions driving the rank CLI scenarios.

use super::helpers::{Workspace, write_utf8};
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use siteline_core::Ranking;
use std::cell::RefCell;

struct RankWorld {
    workspace: Workspace,
    include_db: RefCell<bool>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RankWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            include_db: RefCell::new(true),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["siteline".to_owned(), "rank".to_owned()];
        if *self.include_db.borrow() {
            argv.extend([
                format!("--{ARG_CANDIDATES_DB}"),
                self.workspace.db_path().into_string(),
            ]);
        }
        argv.extend([
            format!("--{ARG_CACHE_DIR}"),
            self.workspace.cache_dir().into_string(),
            format!("--{ARG_WORKERS}"),
            "2".to_owned(),
        ]);
        if self.workspace.policies_path().exists() {
            argv.extend([
                format!("--{ARG_POLICIES}"),
                self.workspace.policies_path().into_string(),
            ]);
        }
        argv
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

    fn ranking(&self) -> Ranking {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON ranking")
    }
}

#[fixture]
fn world() -> RankWorld {
    RankWorld::new()
}

#[given("an offices database with studios near and far from a Starbucks")]
fn offices_database(#[from(world)] world: &RankWorld) {
    world.workspace.seed_offices();
}

#[given("the venue cache holds that Starbucks")]
fn cached_starbucks(#[from(world)] world: &RankWorld) {
    world.workspace.seed_starbucks();
}

#[given("a policy file weighting only Starbucks")]
fn starbucks_policy(#[from(world)] world: &RankWorld) {
    world.workspace.write_starbucks_policy();
}

#[given("a malformed policy file")]
fn malformed_policy(#[from(world)] world: &RankWorld) {
    write_utf8(&world.workspace.policies_path(), b"[1, 2, 3]");
}

#[given("I omit the candidates database")]
fn omit_database(#[from(world)] world: &RankWorld) {
    *world.include_db.borrow_mut() = false;
}

#[when("I run the rank command")]
fn run_rank_command(#[from(world)] world: &RankWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Rank(args) => {
            let mut buffer = world.stdout.borrow_mut();
            rank::run_rank_with(args, &mut *buffer)
        }
        Command::Fetch(_) => panic!("expected rank command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a JSON ranking")]
fn command_succeeds(#[from(world)] world: &RankWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
    assert!(!world.ranking().truncated);
}

#[then("the nearby studio ranks first")]
fn nearby_studio_first(#[from(world)] world: &RankWorld) {
    let ranking = world.ranking();
    let names: Vec<_> = ranking.ranked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Near Studio", "Far Studio"]);
}

#[then("the studio without coordinates is reported")]
fn ghost_reported(#[from(world)] world: &RankWorld) {
    let ranking = world.ranking();
    let reported: Vec<_> = ranking
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.candidate.as_str())
        .collect();
    assert_eq!(reported, ["Ghost Studio"]);
}

#[then("the command fails because the candidates database is missing")]
fn fails_missing_database(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_CANDIDATES_DB),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the policies cannot be parsed")]
fn fails_parsing_policies(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::ParsePolicies { path, .. } => {
            assert_eq!(*path, world.workspace.policies_path());
        }
        other => panic!("expected ParsePolicies, found {other:?}"),
    }
}

macro_rules! register_rank_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rank_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RankWorld) {
            let _ = world;
        }
    };
}

register_rank_scenario!(rank_happy_path, "ranking offices against cached venues");
register_rank_scenario!(rank_missing_database, "rejecting a missing candidates database");
register_rank_scenario!(rank_malformed_policies, "rejecting malformed policy files");
