//! Nearest-point projection onto a polyline.

use super::planar::pieces;
use super::point::{Location, validate_line};
use crate::error::GeometryError;

/// Result of projecting a point onto a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineProjection {
    /// Nearest point on the line
    pub point: Location,
    /// Distance along the line from its first coordinate to `point` (meters).
    /// Non-decreasing in the direction of travel; only comparable between
    /// projections onto the same line.
    pub along_m: f64,
    /// Index of the segment containing `point`
    pub segment_index: usize,
    /// Distance from the input point to `point` (meters)
    pub offset_m: f64,
}

/// Project `point` onto `line`.
///
/// Each segment is projected piecewise, every piece in its own local frame,
/// with the parameter clamped to [0, 1]. `along_m` sums great-circle piece
/// lengths. When two segments are equally near, the lower segment index
/// wins.
pub fn project_onto_line(
    line: &[Location],
    point: Location,
) -> Result<LineProjection, GeometryError> {
    validate_line(line)?;
    point.validate()?;

    let mut best: Option<LineProjection> = None;
    let mut walked = 0.0;

    for (i, w) in line.windows(2).enumerate() {
        for piece in pieces(w[0], w[1]) {
            let p = piece.frame.to_local(point);
            let ab = piece.end - piece.start;
            let len_sq = ab.length_sq();

            let t = if len_sq > 0.0 {
                ((p - piece.start).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let nearest = piece.start + ab * t;
            let offset = (p - nearest).length();

            if best.is_none_or(|b| offset < b.offset_m) {
                best = Some(LineProjection {
                    point: piece.frame.to_geo(nearest),
                    along_m: walked + t * piece.length_m,
                    segment_index: i,
                    offset_m: offset,
                });
            }
            walked += piece.length_m;
        }
    }

    // validate_line guarantees at least one segment
    best.ok_or(GeometryError::EmptyLine(line.len()))
}
