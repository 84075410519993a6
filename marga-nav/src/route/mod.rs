//! Route model and Directions-response decoding.

pub mod directions;
mod model;

pub use directions::{DirectionsResponse, parse_routes};
pub use model::{Maneuver, ManeuverKind, Modifier, Route, Step};
