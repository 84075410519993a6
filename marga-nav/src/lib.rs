//! # MargaNav
//!
//! Turn-by-turn guidance: matches a stream of noisy position fixes against a
//! planned route, announces each maneuver once and in order, detects when
//! the traveler leaves the route, and reroutes.
//!
//! ## Overview
//!
//! - **Geometry**: corridor buffering, containment, line projection and
//!   great-circle distance over WGS84 coordinates
//! - **Route model**: steps with maneuvers, decoded from Directions JSON
//! - **Router**: the routing backend contract
//! - **Director**: the matching state machine
//! - **Events**: typed guidance events with isolated subscribers
//! - **Service**: a single-consumer worker that owns the Director
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marga_nav::{Director, DirectorConfig, GuidanceEvent, Location, ScriptedRouter};
//!
//! let router = Arc::new(ScriptedRouter::with_routes(routes));
//! let mut director = Director::new(router, DirectorConfig::default())?
//!     .with_location(Location::new(-118.5, 34.02))?;
//! director.events_mut().subscribe(|e: &GuidanceEvent| println!("{}", e.name()));
//!
//! director.navigate(Location::new(-118.494, 34.0227))?;
//! for fix in fixes {
//!     director.update_location(fix);
//! }
//! ```
//!
//! ## Coordinates
//!
//! Longitude first, degrees, as in GeoJSON. Distances are meters.

pub mod config;
pub mod director;
pub mod error;
pub mod events;
pub mod geometry;
pub mod haptics;
pub mod route;
pub mod router;
pub mod service;
pub mod simulate;

// Re-export commonly used types
pub use config::{AppConfig, DirectorConfig, RouterConfig, ServiceConfig, SimulationConfig};
pub use director::{CancelToken, Director, Phase, Resolution};
pub use error::{ErrorKind, GeometryError, ListenerError, NavError, Result, RouterError};
pub use events::{EventBus, GuidanceEvent, GuidanceListener, SubscriptionId};
pub use geometry::Location;
pub use haptics::{HapticListener, Vibrate};
pub use route::{Maneuver, ManeuverKind, Modifier, Route, Step};
pub use router::{FixtureRouter, Router, ScriptedRouter, TimeoutRouter};
pub use service::{DirectorHandle, DirectorService, StatusSnapshot};
pub use simulate::Simulator;
