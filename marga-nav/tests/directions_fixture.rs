//! Guidance over Directions responses loaded from disk, where each step's
//! maneuver sits at the start of its geometry.

mod common;

use std::sync::Arc;

use common::{Recorder, fixture_path, walk};
use marga_nav::geometry::{bearing, destination};
use marga_nav::{
    Director, DirectorConfig, FixtureRouter, GuidanceEvent, Location, ManeuverKind, Modifier,
    NavError, Phase, Route, RouterError, Simulator,
};

fn load(reroute: Option<&str>) -> Arc<FixtureRouter> {
    let reroute = reroute.map(fixture_path);
    Arc::new(
        FixtureRouter::from_files(&fixture_path("simple.directions.json"), reroute.as_deref())
            .unwrap(),
    )
}

fn primary(router: &FixtureRouter) -> Route {
    router.primary_routes().unwrap()[0].clone()
}

fn navigating(router: Arc<FixtureRouter>) -> (Director, Recorder, Route) {
    let route = primary(&router);
    let mut director = Director::new(router, DirectorConfig::default())
        .unwrap()
        .with_location(route.start())
        .unwrap();
    let recorder = Recorder::default();
    director.events_mut().subscribe(recorder.listener());
    director.navigate(route.end()).unwrap();
    (director, recorder, route)
}

/// `meters` from `from` towards `to`.
fn toward(from: Location, to: Location, meters: f64) -> Location {
    destination(from, bearing(from, to), meters)
}

#[test]
fn test_fixture_decodes() {
    let router = load(None);
    let route = primary(&router);

    assert_eq!(route.len(), 4);
    assert_eq!(route.geometry().len(), 4);
    assert_eq!(route.distance_m(), 853.2);

    let kinds: Vec<_> = route.steps().iter().map(|s| s.maneuver.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ManeuverKind::Depart,
            ManeuverKind::Turn,
            ManeuverKind::Turn,
            ManeuverKind::Arrive
        ]
    );
    assert_eq!(route.steps()[1].maneuver.modifier, Some(Modifier::Left));
    assert_eq!(route.steps()[2].maneuver.modifier, Some(Modifier::Right));
    // Arrive step is a point widened to a line
    assert_eq!(route.steps()[3].geometry.len(), 2);
}

#[test]
fn test_walk_fixture_route() {
    let (mut director, recorder, route) = navigating(load(None));

    for fix in walk(&route, 10.0) {
        director.update_location(fix);
    }

    assert_eq!(recorder.step_indices(), vec![0, 1, 2, 3]);
    assert_eq!(recorder.count("finish"), 1);
    assert_eq!(recorder.count("deviation"), 0);
    assert_eq!(recorder.count("error"), 0);
    assert_eq!(director.phase(), Phase::Finished);
}

#[test]
fn test_simulated_feed_over_fixture() {
    let (mut director, recorder, route) = navigating(load(None));

    let sim = Simulator::default();
    let fixes = sim.fixes_for(&route);
    assert_eq!(fixes.len(), 20);
    let summary = sim.replay_direct(&mut director, &fixes);

    assert!(summary.stopped);
    assert_eq!(recorder.count("finish"), 1);
    assert_eq!(recorder.step_indices().first(), Some(&0));
    assert_eq!(recorder.step_indices().last(), Some(&3));
}

#[test]
fn test_passed_turn_is_skipped() {
    let (mut director, recorder, route) = navigating(load(None));
    let line = route.geometry().to_vec();
    let (m1, m2) = (line[1], line[2]);

    director.update_location(route.start());
    assert_eq!(recorder.step_indices(), vec![0]);

    // Already past the left turn onto Main Street
    director.update_location(toward(m1, m2, 5.0));
    assert_eq!(recorder.step_indices(), vec![0]);
    assert_eq!(recorder.count("deviation"), 0);

    director.update_location(toward(m1, m2, 290.0));
    assert_eq!(recorder.step_indices(), vec![0, 2]);
    assert_eq!(recorder.step_names()[1], "Pier Road");
}

#[test]
fn test_reroute_from_fixture() {
    let router = load(Some("detour.directions.json"));
    let (mut director, recorder, route) = navigating(Arc::clone(&router));
    director.update_location(route.start());
    recorder.clear();

    // 200 m south of Ocean Avenue, where the detour starts
    director.update_location(Location::new(-118.4985, 34.0182));

    assert_eq!(recorder.names(), vec!["deviation", "route", "step"]);
    match &recorder.events()[1] {
        GuidanceEvent::Route(detour) => {
            assert_eq!(detour.len(), 3);
            assert_eq!(detour.end(), route.end());
        }
        other => panic!("expected route, got {other:?}"),
    }
    assert_eq!(recorder.step_names(), vec!["South Street".to_string()]);
    assert_eq!(router.call_count(), 2);
}

#[test]
fn test_no_route_fixture() {
    let router =
        FixtureRouter::from_files(&fixture_path("noroute.directions.json"), None).unwrap();
    assert!(router.primary_routes().is_none());

    let mut director = Director::new(Arc::new(router), DirectorConfig::default())
        .unwrap()
        .with_location(Location::new(-118.5, 34.02))
        .unwrap();
    assert!(matches!(
        director.navigate(Location::new(-118.494, 34.0227)),
        Err(NavError::Routing(RouterError::NoRouteFound))
    ));
}

#[test]
fn test_missing_fixture_is_io_error() {
    let result = FixtureRouter::from_files(&fixture_path("absent.directions.json"), None);
    assert!(matches!(result, Err(NavError::Io(_))));
}
