//! Test utilities for MargaNav guidance scenarios.
//!
//! Routes are laid out on a local grid in meters east/north of a fixed
//! origin, so tests can place fixes at exact distances from maneuvers.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use marga_nav::geometry::{destination, line_length, sample_along};
use marga_nav::{
    Director, DirectorConfig, GuidanceEvent, Location, Maneuver, ManeuverKind, Modifier, Route,
    Router, Step,
};
use parking_lot::Mutex;

/// Grid origin.
pub fn origin() -> Location {
    Location::new(-118.5, 34.02)
}

/// Point `east` then `north` meters from `from`.
pub fn offset(from: Location, east: f64, north: f64) -> Location {
    destination(destination(from, 90.0, east), 0.0, north)
}

/// Point `east` then `north` meters from the origin.
pub fn at(east: f64, north: f64) -> Location {
    offset(origin(), east, north)
}

/// S(0,0) → M1(300,0) → M2(300,300) → D(600,300), maneuvers at step ends.
pub fn grid_route() -> Route {
    grid_route_from(origin())
}

/// The grid route laid out from another origin.
pub fn grid_route_from(from: Location) -> Route {
    let (s, m1, m2, d) = (
        offset(from, 0.0, 0.0),
        offset(from, 300.0, 0.0),
        offset(from, 300.0, 300.0),
        offset(from, 600.0, 300.0),
    );
    Route::from_steps(vec![
        Step::new(
            "Depart",
            vec![s, s],
            Maneuver::new(s, ManeuverKind::Depart).with_instruction("Head east"),
        ),
        Step::new(
            "Ocean Avenue",
            vec![s, m1],
            Maneuver::new(m1, ManeuverKind::Turn).with_modifier(Modifier::Left),
        ),
        Step::new(
            "Main Street",
            vec![m1, m2],
            Maneuver::new(m2, ManeuverKind::Turn).with_modifier(Modifier::Right),
        ),
        Step::new(
            "Pier Road",
            vec![m2, d],
            Maneuver::new(d, ManeuverKind::Arrive),
        ),
    ])
    .unwrap()
}

pub fn grid_destination() -> Location {
    at(600.0, 300.0)
}

/// X(0,-200) → (600,-200) → D(600,300): the detour after leaving the grid
/// route southwards.
pub fn detour_route() -> Route {
    let (x, corner, d) = (at(0.0, -200.0), at(600.0, -200.0), at(600.0, 300.0));
    Route::from_steps(vec![
        Step::new("Depart", vec![x, x], Maneuver::new(x, ManeuverKind::Depart)),
        Step::new(
            "South Street",
            vec![x, corner],
            Maneuver::new(corner, ManeuverKind::Turn).with_modifier(Modifier::Left),
        ),
        Step::new("Harbor Road", vec![corner, d], Maneuver::new(d, ManeuverKind::Arrive)),
    ])
    .unwrap()
}

/// Fixes every `spacing_m` meters along a route's line.
pub fn walk(route: &Route, spacing_m: f64) -> Vec<Location> {
    let length = line_length(route.geometry());
    let n = (length / spacing_m).round() as usize + 1;
    sample_along(route.geometry(), n)
}

/// Records every event delivered to it.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<GuidanceEvent>>>,
}

impl Recorder {
    pub fn listener(&self) -> impl FnMut(&GuidanceEvent) + Send + 'static {
        let events = Arc::clone(&self.events);
        move |e: &GuidanceEvent| events.lock().push(e.clone())
    }

    pub fn events(&self) -> Vec<GuidanceEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(GuidanceEvent::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }

    /// Indices of announced steps, in order.
    pub fn step_indices(&self) -> Vec<usize> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                GuidanceEvent::Step { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn step_names(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                GuidanceEvent::Step { step, .. } => Some(step.name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Director at the grid origin with default config and a recorder attached.
pub fn director_with(router: Arc<dyn Router>) -> (Director, Recorder) {
    director_with_config(router, DirectorConfig::default())
}

pub fn director_with_config(router: Arc<dyn Router>, config: DirectorConfig) -> (Director, Recorder) {
    let mut director = Director::new(router, config)
        .unwrap()
        .with_location(at(0.0, 0.0))
        .unwrap();
    let recorder = Recorder::default();
    director.events_mut().subscribe(recorder.listener());
    (director, recorder)
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
