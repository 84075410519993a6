//! Router serving Directions responses loaded from disk.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::Router;
use crate::error::{Result, RouterError};
use crate::geometry::Location;
use crate::route::{DirectionsResponse, Route};

type Response = std::result::Result<Vec<Route>, RouterError>;

/// Serves a primary response for the first call and an optional reroute
/// response for every call after it.
pub struct FixtureRouter {
    primary: Response,
    reroute: Option<Response>,
    calls: AtomicUsize,
}

impl FixtureRouter {
    /// Load Directions JSON files.
    ///
    /// I/O and JSON errors fail here. A well-formed response with zero
    /// routes is kept and answered as [`RouterError::NoRouteFound`].
    pub fn from_files(primary: &Path, reroute: Option<&Path>) -> Result<Self> {
        let primary = load(primary)?;
        let reroute = reroute.map(load).transpose()?;
        Ok(Self {
            primary,
            reroute,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn from_routes(primary: Vec<Route>, reroute: Option<Vec<Route>>) -> Self {
        Self {
            primary: Ok(primary),
            reroute: reroute.map(Ok),
            calls: AtomicUsize::new(0),
        }
    }

    /// Routes of the primary response, if it has any.
    pub fn primary_routes(&self) -> Option<&[Route]> {
        self.primary.as_deref().ok()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

fn load(path: &Path) -> Result<Response> {
    debug!("Loading directions fixture {:?}", path);
    let json = std::fs::read_to_string(path)?;
    let response = DirectionsResponse::from_json(&json)?;
    Ok(response.into_routes())
}

impl Router for FixtureRouter {
    fn get_route(&self, _start: Location, _end: Location) -> Response {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        match (&self.reroute, call) {
            (Some(reroute), n) if n > 0 => reroute.clone(),
            _ => self.primary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Maneuver, ManeuverKind, Step};
    use std::io::Write;

    fn route(name: &str) -> Route {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 0.001);
        Route::from_steps(vec![Step::new(
            name,
            vec![a, b],
            Maneuver::new(b, ManeuverKind::Arrive),
        )])
        .unwrap()
    }

    #[test]
    fn test_reroute_served_after_first_call() {
        let router = FixtureRouter::from_routes(vec![route("first")], Some(vec![route("second")]));
        let p = Location::new(0.0, 0.0);
        assert_eq!(router.get_route(p, p).unwrap()[0].steps()[0].name, "first");
        assert_eq!(router.get_route(p, p).unwrap()[0].steps()[0].name, "second");
        assert_eq!(router.get_route(p, p).unwrap()[0].steps()[0].name, "second");
        assert_eq!(router.call_count(), 3);
    }

    #[test]
    fn test_without_reroute_primary_repeats() {
        let router = FixtureRouter::from_routes(vec![route("only")], None);
        let p = Location::new(0.0, 0.0);
        router.get_route(p, p).unwrap();
        assert_eq!(router.get_route(p, p).unwrap()[0].steps()[0].name, "only");
    }

    #[test]
    fn test_empty_fixture_answers_no_route() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"code": "Ok", "routes": []}}"#).unwrap();
        let router = FixtureRouter::from_files(file.path(), None).unwrap();
        assert!(router.primary_routes().is_none());
        let p = Location::new(0.0, 0.0);
        assert_eq!(router.get_route(p, p), Err(RouterError::NoRouteFound));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FixtureRouter::from_files(Path::new("/nonexistent/route.json"), None);
        assert!(matches!(result, Err(crate::error::NavError::Io(_))));
    }
}
