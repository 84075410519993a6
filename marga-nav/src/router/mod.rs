//! Router contract and implementations.
//!
//! The Director asks a [`Router`] for candidate routes between two
//! coordinates and always takes the first. Routers are blocking; the
//! Director is expected to run on its own thread (see
//! [`service`](crate::service)).

mod fixture;
mod scripted;
mod timeout;

use std::sync::Arc;

pub use fixture::FixtureRouter;
pub use scripted::{RouteHold, ScriptedRouter};
pub use timeout::TimeoutRouter;

use crate::error::RouterError;
use crate::geometry::Location;
use crate::route::Route;

/// Resolves routes between two coordinates.
pub trait Router: Send + Sync {
    /// Candidate routes from `start` to `end`, best first.
    ///
    /// An empty candidate list must be reported as
    /// [`RouterError::NoRouteFound`] rather than `Ok(vec![])`.
    fn get_route(&self, start: Location, end: Location) -> Result<Vec<Route>, RouterError>;
}

impl<R: Router + ?Sized> Router for Arc<R> {
    fn get_route(&self, start: Location, end: Location) -> Result<Vec<Route>, RouterError> {
        (**self).get_route(start, end)
    }
}

impl<R: Router + ?Sized> Router for Box<R> {
    fn get_route(&self, start: Location, end: Location) -> Result<Vec<Route>, RouterError> {
        (**self).get_route(start, end)
    }
}
