//! Buffered corridor around a polyline.
//!
//! The corridor is a union of capsules. Segments are split into pieces of
//! at most [`MAX_PIECE_M`](super::planar::MAX_PIECE_M) and each piece gets
//! a capsule in its own local frame: a rectangle of half-width `width`
//! capped by two semicircles. The cap
//! vertices are circumscribed (intermediate vertices pushed out to
//! `r / cos(Δ/2)`) so every point within `width` meters of the line falls
//! inside the polygon; the overshoot is under 2% of the width.
//!
//! Containment is an even-odd ray cast against each capsule ring. Working
//! per capsule avoids computing a polygon union, and a point is inside the
//! corridor iff it is inside any capsule.

use std::f64::consts::{FRAC_PI_2, PI};

use super::planar::{LocalFrame, Piece, Vec2, pieces};
use super::point::{Location, validate_line};
use crate::error::GeometryError;

/// Vertices per semicircular cap (excluding the two endpoints).
const CAP_SEGMENTS: usize = 16;

/// Segments shorter than this are treated as a single point.
const DEGENERATE_SEGMENT_M: f64 = 1e-9;

/// Axis-aligned bounds in local meters.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn of(points: &[Vec2]) -> Self {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    #[inline]
    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// One capsule ring (open: the closing edge is implicit) in its piece's
/// frame.
#[derive(Clone, Debug, PartialEq)]
struct Capsule {
    frame: LocalFrame,
    ring: Vec<Vec2>,
    bounds: Bounds,
}

impl Capsule {
    fn around(piece: &Piece, radius: f64) -> Self {
        let (a, b) = (piece.start, piece.end);
        let u = b - a;
        let heading = if u.length() > DEGENERATE_SEGMENT_M {
            u.y.atan2(u.x)
        } else {
            0.0
        };

        let mut ring = Vec::with_capacity(2 * (CAP_SEGMENTS + 2));
        push_cap(&mut ring, b, radius, heading - FRAC_PI_2);
        push_cap(&mut ring, a, radius, heading + FRAC_PI_2);

        let bounds = Bounds::of(&ring);
        Self {
            frame: piece.frame,
            ring,
            bounds,
        }
    }

    fn contains(&self, point: Location) -> bool {
        let p = self.frame.to_local(point);
        self.bounds.contains(p) && ring_contains(&self.ring, p)
    }
}

/// Half-turn of vertices around `center`, counter-clockwise from `start`.
fn push_cap(ring: &mut Vec<Vec2>, center: Vec2, radius: f64, start: f64) {
    let step = PI / CAP_SEGMENTS as f64;
    let outer = radius / (step / 2.0).cos();

    ring.push(center + Vec2::from_angle(start) * radius);
    for k in 0..CAP_SEGMENTS {
        let theta = start + (k as f64 + 0.5) * step;
        ring.push(center + Vec2::from_angle(theta) * outer);
    }
    ring.push(center + Vec2::from_angle(start + PI) * radius);
}

/// Even-odd ray cast.
fn ring_contains(ring: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Polygon enclosing every point within `width_m` of a line.
#[derive(Clone, Debug, PartialEq)]
pub struct Corridor {
    width_m: f64,
    capsules: Vec<Capsule>,
}

impl Corridor {
    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    /// Number of polygons in the corridor (one per segment piece).
    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    /// Closed rings in degrees, for rendering.
    pub fn rings(&self) -> Vec<Vec<Location>> {
        self.capsules
            .iter()
            .map(|c| {
                let mut ring: Vec<Location> =
                    c.ring.iter().map(|&v| c.frame.to_geo(v)).collect();
                if let Some(&first) = ring.first() {
                    ring.push(first);
                }
                ring
            })
            .collect()
    }

    fn contains(&self, point: Location) -> bool {
        self.capsules.iter().any(|c| c.contains(point))
    }
}

/// Buffer `line` by `width_m` meters.
pub fn corridor(line: &[Location], width_m: f64) -> Result<Corridor, GeometryError> {
    validate_line(line)?;
    if !width_m.is_finite() || width_m <= 0.0 {
        return Err(GeometryError::InvalidWidth(width_m));
    }

    let capsules = line
        .windows(2)
        .flat_map(|w| pieces(w[0], w[1]))
        .map(|piece| Capsule::around(&piece, width_m))
        .collect();

    Ok(Corridor {
        width_m,
        capsules,
    })
}

/// Whether `point` lies inside `corridor`.
pub fn within_corridor(point: Location, corridor: &Corridor) -> Result<bool, GeometryError> {
    point.validate()?;
    Ok(corridor.contains(point))
}
