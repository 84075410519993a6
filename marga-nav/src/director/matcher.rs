//! Matching a fix against the active route.
//!
//! [`RouteTracker`] precomputes the full-route corridor, one corridor per
//! step, and each maneuver's along-line position on its own step. A fix is
//! then classified in one pass:
//!
//! 1. Outside the route corridor: deviated.
//! 2. Otherwise scan steps from the cursor. The first step whose corridor
//!    contains the fix and whose maneuver is not already behind the fix is
//!    the match.
//! 3. A matched maneuver within the lead distance is due for announcement.

use std::sync::Arc;

use crate::error::GeometryError;
use crate::geometry::{
    Corridor, Location, corridor, distance_meters, project_onto_line, within_corridor,
};
use crate::route::Route;

/// Slack on the lead-distance gate (meters).
const LEAD_TOLERANCE_M: f64 = 1e-6;

/// A fix this far past the maneuver along the step line counts as passed.
const PASSED_TOLERANCE_M: f64 = 1e-6;

/// How one fix relates to the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Outside the route corridor.
    Deviated,
    /// Step `index` matched and its maneuver is within the lead distance.
    Announce(usize),
    /// Step `index` matched but its maneuver is still `distance_m` away.
    Approaching { index: usize, distance_m: f64 },
    /// Inside the route corridor but no remaining step matched.
    Unmatched,
}

#[derive(Debug, Clone)]
struct StepTrack {
    corridor: Corridor,
    maneuver_along_m: f64,
}

/// Precomputed matching geometry for one route.
#[derive(Debug, Clone)]
pub struct RouteTracker {
    route: Arc<Route>,
    corridor: Corridor,
    steps: Vec<StepTrack>,
}

impl RouteTracker {
    pub fn build(route: Arc<Route>, width_m: f64) -> Result<Self, GeometryError> {
        let route_corridor = corridor(route.geometry(), width_m)?;
        let steps = route
            .steps()
            .iter()
            .map(|step| {
                let maneuver = project_onto_line(&step.geometry, step.maneuver.location)?;
                Ok(StepTrack {
                    corridor: corridor(&step.geometry, width_m)?,
                    maneuver_along_m: maneuver.along_m,
                })
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        Ok(Self {
            route,
            corridor: route_corridor,
            steps,
        })
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Full-route corridor, for rendering.
    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    /// Classify `fix` with the cursor at `from`.
    pub fn evaluate(
        &self,
        fix: Location,
        from: usize,
        lead_m: f64,
    ) -> Result<Evaluation, GeometryError> {
        if !within_corridor(fix, &self.corridor)? {
            return Ok(Evaluation::Deviated);
        }

        let Some(index) = self.next_step(fix, from)? else {
            return Ok(Evaluation::Unmatched);
        };

        let maneuver = self.route.steps()[index].maneuver.location;
        let distance_m = distance_meters(fix, maneuver);
        if distance_m <= lead_m + LEAD_TOLERANCE_M {
            Ok(Evaluation::Announce(index))
        } else {
            Ok(Evaluation::Approaching { index, distance_m })
        }
    }

    /// First step at or after `from` whose corridor contains `fix` and whose
    /// maneuver has not been passed.
    pub fn next_step(
        &self,
        fix: Location,
        from: usize,
    ) -> Result<Option<usize>, GeometryError> {
        for (index, track) in self.steps.iter().enumerate().skip(from) {
            if !within_corridor(fix, &track.corridor)? {
                continue;
            }
            let geometry = &self.route.steps()[index].geometry;
            let along = project_onto_line(geometry, fix)?.along_m;
            if along > track.maneuver_along_m + PASSED_TOLERANCE_M {
                continue;
            }
            return Ok(Some(index));
        }
        Ok(None)
    }
}
