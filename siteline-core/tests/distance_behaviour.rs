//! Behaviour tests for the distance model.
#![expect(clippy::float_arithmetic, reason = "tolerance checks")]

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use siteline_core::{GeoPoint, distance_meters, normalized_score};

#[derive(Debug, Default, Clone, Copy)]
struct Decay {
    distance: f64,
    max_distance: f64,
}

#[fixture]
fn points() -> RefCell<Vec<GeoPoint>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn decay() -> Cell<Decay> {
    Cell::new(Decay::default())
}

#[fixture]
fn result() -> Cell<f64> {
    Cell::new(f64::NAN)
}

fn set_decay(decay: &Cell<Decay>, distance: f64) {
    decay.set(Decay {
        distance,
        max_distance: 1000.0,
    });
}

#[given("two identical points in San Francisco")]
fn given_identical(#[from(points)] points: &RefCell<Vec<GeoPoint>>) {
    let point = GeoPoint::new(-122.4103305, 37.7804301).expect("valid point");
    points.replace(vec![point, point]);
}

#[given("a venue 1000 meters away with a 1000 meter cutoff")]
fn given_at_cutoff(#[from(decay)] decay: &Cell<Decay>) {
    set_decay(decay, 1000.0);
}

#[given("a venue 1200 meters away with a 1000 meter cutoff")]
fn given_beyond_cutoff(#[from(decay)] decay: &Cell<Decay>) {
    set_decay(decay, 1200.0);
}

#[given("a venue 600 meters away with a 1000 meter cutoff")]
fn given_nearby(#[from(decay)] decay: &Cell<Decay>) {
    set_decay(decay, 600.0);
}

#[when("I measure the distance between them")]
fn when_measure(
    #[from(points)] points: &RefCell<Vec<GeoPoint>>,
    #[from(result)] result: &Cell<f64>,
) {
    let pair = points.borrow();
    let [a, b] = pair.as_slice() else {
        panic!("expected two points");
    };
    result.set(distance_meters(*a, *b));
}

#[when("I normalise the distance")]
fn when_normalise(#[from(decay)] decay: &Cell<Decay>, #[from(result)] result: &Cell<f64>) {
    let Decay {
        distance,
        max_distance,
    } = decay.get();
    result.set(normalized_score(distance, max_distance));
}

#[then("the distance is zero meters")]
fn then_zero(#[from(result)] result: &Cell<f64>) {
    assert_eq!(result.get(), 0.0);
}

#[then("the normalised score is 0.0")]
fn then_score_zero(#[from(result)] result: &Cell<f64>) {
    assert_eq!(result.get(), 0.0);
}

#[then("the normalised score is 0.8")]
fn then_score_point_eight(#[from(result)] result: &Cell<f64>) {
    assert!((result.get() - 0.8).abs() <= 1e-12);
}

#[scenario(path = "tests/features/distance.feature", index = 0)]
fn coincident_points(points: RefCell<Vec<GeoPoint>>, result: Cell<f64>) {
    let _ = (points, result);
}

#[scenario(path = "tests/features/distance.feature", index = 1)]
fn at_cutoff(decay: Cell<Decay>, result: Cell<f64>) {
    let _ = (decay, result);
}

#[scenario(path = "tests/features/distance.feature", index = 2)]
fn beyond_cutoff(decay: Cell<Decay>, result: Cell<f64>) {
    let _ = (decay, result);
}

#[scenario(path = "tests/features/distance.feature", index = 3)]
fn square_root_decay(decay: Cell<Decay>, result: Cell<f64>) {
    let _ = (decay, result);
}
