//! Route, step and maneuver types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;
use crate::geometry::{Location, line_length, validate_line};

/// Maneuver category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ManeuverKind {
    Depart,
    Arrive,
    Turn,
    Continue,
    NewName,
    Merge,
    OnRamp,
    OffRamp,
    Fork,
    EndOfRoad,
    Roundabout,
    Rotary,
    Notification,
    /// Any value not listed above, kept verbatim.
    Other(String),
}

impl ManeuverKind {
    pub fn as_str(&self) -> &str {
        match self {
            ManeuverKind::Depart => "depart",
            ManeuverKind::Arrive => "arrive",
            ManeuverKind::Turn => "turn",
            ManeuverKind::Continue => "continue",
            ManeuverKind::NewName => "new name",
            ManeuverKind::Merge => "merge",
            ManeuverKind::OnRamp => "on ramp",
            ManeuverKind::OffRamp => "off ramp",
            ManeuverKind::Fork => "fork",
            ManeuverKind::EndOfRoad => "end of road",
            ManeuverKind::Roundabout => "roundabout",
            ManeuverKind::Rotary => "rotary",
            ManeuverKind::Notification => "notification",
            ManeuverKind::Other(s) => s,
        }
    }
}

impl From<&str> for ManeuverKind {
    fn from(s: &str) -> Self {
        match s {
            "depart" => ManeuverKind::Depart,
            "arrive" => ManeuverKind::Arrive,
            "turn" => ManeuverKind::Turn,
            "continue" => ManeuverKind::Continue,
            "new name" => ManeuverKind::NewName,
            "merge" => ManeuverKind::Merge,
            "on ramp" => ManeuverKind::OnRamp,
            "off ramp" => ManeuverKind::OffRamp,
            "fork" => ManeuverKind::Fork,
            "end of road" => ManeuverKind::EndOfRoad,
            "roundabout" => ManeuverKind::Roundabout,
            "rotary" => ManeuverKind::Rotary,
            "notification" => ManeuverKind::Notification,
            other => ManeuverKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ManeuverKind {
    fn from(s: String) -> Self {
        ManeuverKind::from(s.as_str())
    }
}

impl From<ManeuverKind> for String {
    fn from(kind: ManeuverKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional modifier of a maneuver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    #[serde(rename = "uturn")]
    Uturn,
    #[serde(rename = "sharp right")]
    SharpRight,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "slight right")]
    SlightRight,
    #[serde(rename = "straight")]
    Straight,
    #[serde(rename = "slight left")]
    SlightLeft,
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "sharp left")]
    SharpLeft,
}

impl Modifier {
    /// Parse a wire value; unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "uturn" => Modifier::Uturn,
            "sharp right" => Modifier::SharpRight,
            "right" => Modifier::Right,
            "slight right" => Modifier::SlightRight,
            "straight" => Modifier::Straight,
            "slight left" => Modifier::SlightLeft,
            "left" => Modifier::Left,
            "sharp left" => Modifier::SharpLeft,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Uturn => "uturn",
            Modifier::SharpRight => "sharp right",
            Modifier::Right => "right",
            Modifier::SlightRight => "slight right",
            Modifier::Straight => "straight",
            Modifier::SlightLeft => "slight left",
            Modifier::Left => "left",
            Modifier::SharpLeft => "sharp left",
        }
    }
}

/// A point requiring a directional action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub location: Location,
    pub kind: ManeuverKind,
    pub modifier: Option<Modifier>,
    /// Human-readable instruction, if the router supplied one
    pub instruction: Option<String>,
    /// Heading after the maneuver in degrees
    pub bearing_after: Option<f64>,
}

impl Maneuver {
    pub fn new(location: Location, kind: ManeuverKind) -> Self {
        Self {
            location,
            kind,
            modifier: None,
            instruction: None,
            bearing_after: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}

/// A route segment and the maneuver it leads to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub geometry: Vec<Location>,
    pub maneuver: Maneuver,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl Step {
    /// Step with distance measured from its geometry and no duration.
    pub fn new(name: impl Into<String>, geometry: Vec<Location>, maneuver: Maneuver) -> Self {
        let distance_m = line_length(&geometry);
        Self {
            name: name.into(),
            geometry,
            maneuver,
            distance_m,
            duration_s: 0.0,
        }
    }
}

/// An immutable planned route: ordered steps plus the full line.
///
/// Shared as `Arc<Route>`; a new route replaces the old one wholesale.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    geometry: Vec<Location>,
    steps: Vec<Step>,
    distance_m: f64,
    duration_s: f64,
}

impl Route {
    /// Build a route, rejecting empty step lists and degenerate lines.
    pub fn new(geometry: Vec<Location>, steps: Vec<Step>) -> Result<Self, RouterError> {
        if steps.is_empty() {
            return Err(RouterError::InvalidRoute("route has no steps".into()));
        }
        validate_line(&geometry)
            .map_err(|e| RouterError::InvalidRoute(format!("route geometry: {e}")))?;
        for (i, step) in steps.iter().enumerate() {
            validate_line(&step.geometry)
                .map_err(|e| RouterError::InvalidRoute(format!("step {i} geometry: {e}")))?;
            step.maneuver.location.validate().map_err(|e| {
                RouterError::InvalidRoute(format!("step {i} maneuver: {e}"))
            })?;
        }

        let distance_m = steps.iter().map(|s| s.distance_m).sum();
        let duration_s = steps.iter().map(|s| s.duration_s).sum();
        Ok(Self {
            geometry,
            steps,
            distance_m,
            duration_s,
        })
    }

    /// Build a route whose full line is the concatenation of its steps.
    pub fn from_steps(steps: Vec<Step>) -> Result<Self, RouterError> {
        let mut geometry: Vec<Location> = Vec::new();
        for step in &steps {
            for &c in &step.geometry {
                if geometry.last() != Some(&c) {
                    geometry.push(c);
                }
            }
        }
        // All steps collapsed onto one point
        if geometry.len() == 1 {
            geometry.push(geometry[0]);
        }
        Self::new(geometry, steps)
    }

    /// Override the summary totals reported by a router.
    pub(crate) fn with_totals(mut self, distance_m: f64, duration_s: f64) -> Self {
        self.distance_m = distance_m;
        self.duration_s = duration_s;
        self
    }

    pub fn geometry(&self) -> &[Location] {
        &self.geometry
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed route.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn start(&self) -> Location {
        self.geometry[0]
    }

    pub fn end(&self) -> Location {
        self.geometry[self.geometry.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat)
    }

    #[test]
    fn test_kind_round_trip_strings() {
        for s in ["depart", "new name", "end of road", "off ramp", "arrive"] {
            assert_eq!(ManeuverKind::from(s).as_str(), s);
        }
        assert_eq!(
            ManeuverKind::from("exit rotary"),
            ManeuverKind::Other("exit rotary".into())
        );
    }

    #[test]
    fn test_modifier_parse() {
        assert_eq!(Modifier::parse("sharp left"), Some(Modifier::SharpLeft));
        assert_eq!(Modifier::parse("sideways"), None);
    }

    #[test]
    fn test_route_rejects_empty_steps() {
        let err = Route::new(vec![loc(0.0, 0.0), loc(0.001, 0.0)], vec![]).unwrap_err();
        assert!(matches!(err, RouterError::InvalidRoute(_)));
    }

    #[test]
    fn test_route_rejects_short_step_geometry() {
        let step = Step::new(
            "A",
            vec![loc(0.0, 0.0)],
            Maneuver::new(loc(0.0, 0.0), ManeuverKind::Depart),
        );
        let err = Route::new(vec![loc(0.0, 0.0), loc(0.001, 0.0)], vec![step]).unwrap_err();
        assert!(matches!(err, RouterError::InvalidRoute(_)));
    }

    #[test]
    fn test_from_steps_dedupes_joints() {
        let a = loc(0.0, 0.0);
        let b = loc(0.001, 0.0);
        let c = loc(0.001, 0.001);
        let steps = vec![
            Step::new("A", vec![a, b], Maneuver::new(a, ManeuverKind::Depart)),
            Step::new("B", vec![b, c], Maneuver::new(b, ManeuverKind::Turn)),
            Step::new("B", vec![c, c], Maneuver::new(c, ManeuverKind::Arrive)),
        ];
        let route = Route::from_steps(steps).unwrap();
        assert_eq!(route.geometry(), &[a, b, c]);
        assert_eq!(route.len(), 3);
        assert_eq!(route.start(), a);
        assert_eq!(route.end(), c);
        assert!(route.distance_m() > 200.0);
    }
}
