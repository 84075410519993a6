//! Geometry primitives.
//!
//! Pure functions over WGS84 coordinates:
//!
//! - [`corridor`] / [`within_corridor`]: buffered line containment
//! - [`project_onto_line`]: nearest point with an along-line parameter
//! - [`distance_meters`]: great-circle distance
//! - [`sample_along`]: equally spaced points, used by the simulator

mod corridor;
mod planar;
mod point;
mod projection;
mod sampling;

pub use corridor::{Corridor, corridor, within_corridor};
pub use planar::{LocalFrame, MAX_PIECE_M, Vec2};
pub use point::{
    EARTH_RADIUS_M, Location, bearing, destination, distance_meters, line_length, normalize_lon,
    validate_line,
};
pub use projection::{LineProjection, project_onto_line};
pub use sampling::{point_along, sample_along};
