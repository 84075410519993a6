//! Local planar frame for corridor and projection math.

use std::ops::{Add, Mul, Sub};

use super::point::{
    EARTH_RADIUS_M, Location, bearing, destination, distance_meters, normalize_lon,
};

/// Longest stretch of a segment mapped through a single [`LocalFrame`] (meters).
pub const MAX_PIECE_M: f64 = 1_000.0;

/// 2D vector in local meters (x east, y north).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_sq(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn from_angle(theta: f64) -> Self {
        Self::new(theta.cos(), theta.sin())
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Equirectangular projection anchored at one coordinate.
///
/// Longitude is scaled by the cosine of the anchor latitude. The scale
/// drifts with distance from the anchor, so a frame is only used within
/// [`MAX_PIECE_M`] of where it is anchored. Longitude differences are
/// wrapped, so a frame near ±180° sees both sides as neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    origin: Location,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(origin: Location) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos().max(1e-12),
        }
    }

    pub fn origin(&self) -> Location {
        self.origin
    }

    /// Degrees to local meters.
    pub fn to_local(&self, loc: Location) -> Vec2 {
        Vec2::new(
            normalize_lon(loc.lon - self.origin.lon).to_radians()
                * self.cos_lat
                * EARTH_RADIUS_M,
            (loc.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M,
        )
    }

    /// Local meters back to degrees.
    pub fn to_geo(&self, v: Vec2) -> Location {
        Location::new(
            normalize_lon(self.origin.lon + (v.x / (self.cos_lat * EARTH_RADIUS_M)).to_degrees()),
            self.origin.lat + (v.y / EARTH_RADIUS_M).to_degrees(),
        )
    }
}

/// A stretch of a great-circle segment in its own tangent frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Piece {
    pub frame: LocalFrame,
    pub start: Vec2,
    pub end: Vec2,
    /// Great-circle length in meters
    pub length_m: f64,
}

/// Split segment `a`→`b` into equal pieces of at most [`MAX_PIECE_M`], each
/// anchored at its own midpoint. A zero-length segment is one piece.
pub(crate) fn pieces(a: Location, b: Location) -> Vec<Piece> {
    let length = distance_meters(a, b);
    let n = ((length / MAX_PIECE_M).ceil() as usize).max(1);
    let heading = bearing(a, b);
    let step = length / n as f64;

    let vertex = |i: usize| match i {
        0 => a,
        i if i == n => b,
        i => destination(a, heading, i as f64 * step),
    };

    (0..n)
        .map(|i| {
            let frame = LocalFrame::new(destination(a, heading, (i as f64 + 0.5) * step));
            Piece {
                frame,
                start: frame.to_local(vertex(i)),
                end: frame.to_local(vertex(i + 1)),
                length_m: step,
            }
        })
        .collect()
}
