//! Decoding of Mapbox-style Directions responses.
//!
//! Only GeoJSON geometries are understood (`geometries=geojson`). Only the
//! first leg of each route is read.

use serde::Deserialize;

use super::model::{Maneuver, ManeuverKind, Modifier, Route, Step};
use crate::error::RouterError;
use crate::geometry::Location;

/// Top-level Directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    pub geometry: GeometryDto,
    #[serde(default)]
    pub legs: Vec<LegDto>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    #[serde(default)]
    pub steps: Vec<StepDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepDto {
    #[serde(default)]
    pub name: String,
    pub geometry: GeometryDto,
    pub maneuver: ManeuverDto,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManeuverDto {
    pub location: Location,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub bearing_after: Option<f64>,
}

/// GeoJSON geometry subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeometryDto {
    Point(Location),
    LineString(Vec<Location>),
    MultiLineString(Vec<Vec<Location>>),
}

impl GeometryDto {
    /// Flatten into a polyline of at least two coordinates when possible.
    fn into_line(self) -> Vec<Location> {
        let mut line = match self {
            GeometryDto::Point(p) => vec![p],
            GeometryDto::LineString(line) => line,
            GeometryDto::MultiLineString(parts) => parts.into_iter().flatten().collect(),
        };
        // Arrive steps are often a single point
        if line.len() == 1 {
            line.push(line[0]);
        }
        line
    }
}

impl StepDto {
    fn into_step(self) -> Step {
        let maneuver = Maneuver {
            location: self.maneuver.location,
            kind: ManeuverKind::from(self.maneuver.kind),
            modifier: self.maneuver.modifier.as_deref().and_then(Modifier::parse),
            instruction: self.maneuver.instruction,
            bearing_after: self.maneuver.bearing_after,
        };
        Step {
            name: self.name,
            geometry: self.geometry.into_line(),
            maneuver,
            distance_m: self.distance,
            duration_s: self.duration,
        }
    }
}

impl RouteDto {
    fn into_route(self) -> Result<Route, RouterError> {
        let leg = self
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| RouterError::InvalidRoute("route has no legs".into()))?;
        let steps: Vec<Step> = leg.steps.into_iter().map(StepDto::into_step).collect();
        let route = Route::new(self.geometry.into_line(), steps)?;

        Ok(match (self.distance, self.duration) {
            (Some(distance), Some(duration)) => route.with_totals(distance, duration),
            _ => route,
        })
    }
}

impl DirectionsResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert every candidate into a [`Route`].
    ///
    /// Zero candidates is [`RouterError::NoRouteFound`]; so is a response
    /// whose `code` is `"NoRoute"`.
    pub fn into_routes(self) -> Result<Vec<Route>, RouterError> {
        if self.code.as_deref() == Some("NoRoute") || self.routes.is_empty() {
            return Err(RouterError::NoRouteFound);
        }
        match self.code.as_deref() {
            None | Some("Ok") => {}
            Some(code) => {
                let message = self.message.as_deref().unwrap_or_default();
                return Err(RouterError::Transport(format!("{code}: {message}")));
            }
        }
        self.routes.into_iter().map(RouteDto::into_route).collect()
    }
}

/// Decode a Directions JSON body straight into routes.
pub fn parse_routes(json: &str) -> Result<Vec<Route>, RouterError> {
    DirectionsResponse::from_json(json)
        .map_err(|e| RouterError::InvalidRoute(format!("malformed directions response: {e}")))?
        .into_routes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_STEP: &str = r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {"type": "LineString", "coordinates": [[-118.5, 34.02], [-118.497, 34.02]]},
            "distance": 277.0,
            "duration": 40.0,
            "legs": [{
                "steps": [
                    {
                        "name": "Ocean Avenue",
                        "geometry": {"type": "LineString", "coordinates": [[-118.5, 34.02], [-118.497, 34.02]]},
                        "maneuver": {"location": [-118.5, 34.02], "type": "depart", "bearing_after": 90,
                                     "instruction": "Head east on Ocean Avenue"},
                        "distance": 277.0,
                        "duration": 40.0
                    },
                    {
                        "name": "Ocean Avenue",
                        "geometry": {"type": "Point", "coordinates": [-118.497, 34.02]},
                        "maneuver": {"location": [-118.497, 34.02], "type": "arrive", "modifier": "sideways"}
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_decode_first_leg() {
        let routes = parse_routes(TWO_STEP).unwrap();
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.len(), 2);
        assert_eq!(route.distance_m(), 277.0);

        let depart = &route.steps()[0];
        assert_eq!(depart.maneuver.kind, ManeuverKind::Depart);
        assert_eq!(depart.maneuver.bearing_after, Some(90.0));
        assert_eq!(
            depart.maneuver.instruction.as_deref(),
            Some("Head east on Ocean Avenue")
        );
    }

    #[test]
    fn test_point_geometry_widened() {
        let routes = parse_routes(TWO_STEP).unwrap();
        let arrive = &routes[0].steps()[1];
        assert_eq!(arrive.geometry.len(), 2);
        assert_eq!(arrive.geometry[0], arrive.geometry[1]);
        // Unknown modifier decodes to none
        assert_eq!(arrive.maneuver.modifier, None);
    }

    #[test]
    fn test_zero_routes_is_no_route() {
        let err = parse_routes(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert_eq!(err, RouterError::NoRouteFound);
        let err = parse_routes(r#"{"code": "NoRoute", "message": "none"}"#).unwrap_err();
        assert_eq!(err, RouterError::NoRouteFound);
    }

    #[test]
    fn test_error_code_is_transport() {
        let body = TWO_STEP.replace(r#""code": "Ok""#, r#""code": "ProfileNotFound""#);
        assert!(matches!(
            parse_routes(&body).unwrap_err(),
            RouterError::Transport(_)
        ));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_routes("{not json").unwrap_err(),
            RouterError::InvalidRoute(_)
        ));
    }
}
