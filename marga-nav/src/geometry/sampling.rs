//! Points at fixed distances along a polyline.

use super::point::{Location, bearing, destination, distance_meters};

/// Point `distance_m` along `line` (clamped to its ends).
pub fn point_along(line: &[Location], distance_m: f64) -> Option<Location> {
    let (&first, &last) = (line.first()?, line.last()?);
    if distance_m <= 0.0 {
        return Some(first);
    }

    let mut travelled = 0.0;
    for w in line.windows(2) {
        let seg = distance_meters(w[0], w[1]);
        if travelled + seg >= distance_m {
            let remaining = distance_m - travelled;
            if remaining <= 0.0 || seg == 0.0 {
                return Some(w[0]);
            }
            return Some(destination(w[0], bearing(w[0], w[1]), remaining));
        }
        travelled += seg;
    }
    Some(last)
}

/// `n` equally spaced points along `line`, first at its start and the last
/// exactly at its end coordinate.
///
/// `n == 1` yields only the end.
pub fn sample_along(line: &[Location], n: usize) -> Vec<Location> {
    let Some(&last) = line.last() else {
        return Vec::new();
    };
    match n {
        0 => Vec::new(),
        1 => vec![last],
        _ => {
            let total: f64 = line.windows(2).map(|w| distance_meters(w[0], w[1])).sum();
            let interval = total / (n - 1) as f64;
            let mut points: Vec<Location> = (0..n - 1)
                .filter_map(|i| point_along(line, i as f64 * interval))
                .collect();
            points.push(last);
            points
        }
    }
}
