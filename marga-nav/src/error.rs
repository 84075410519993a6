//! Error types for MargaNav

use std::any::Any;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Degenerate geometry inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Line needs at least 2 coordinates, got {0}")]
    EmptyLine(usize),

    #[error("Non-finite coordinate ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("Invalid corridor width: {0} m")]
    InvalidWidth(f64),
}

/// Failures reported by a [`Router`](crate::router::Router).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// The backend answered with zero candidate routes.
    #[error("No route found")]
    NoRouteFound,

    /// Network or backend failure, including timeouts.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A candidate route could not be used (no steps, malformed leg).
    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}

/// Failure raised by an event subscriber.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListenerError {
    #[error("Listener failed: {0}")]
    Failed(String),

    #[error("Listener panicked: {0}")]
    Panicked(String),
}

impl ListenerError {
    /// Build from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        ListenerError::Panicked(message)
    }
}

/// MargaNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Routing failed: {0}")]
    Routing(#[from] RouterError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("No position fix received yet")]
    NoLocation,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directions decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Director service is not running")]
    ServiceStopped,
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

impl NavError {
    /// Classification carried on the guidance error channel.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NavError::Routing(e) => e.kind(),
            NavError::Geometry(_) | NavError::NoLocation => ErrorKind::Geometry,
            NavError::Config(_) | NavError::Io(_) | NavError::Json(_) => ErrorKind::Transport,
            NavError::ServiceStopped => ErrorKind::Transport,
        }
    }
}

impl RouterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::NoRouteFound => ErrorKind::NoRouteFound,
            RouterError::Transport(_) => ErrorKind::Transport,
            RouterError::InvalidRoute(_) => ErrorKind::InvalidRoute,
        }
    }
}

/// Payload-free error classification published as `GuidanceEvent::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NoRouteFound,
    Transport,
    InvalidRoute,
    Geometry,
    ListenerFault,
    /// The per-fix reroute bound was reached with the fix still off-route.
    RerouteLimit,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoRouteFound => "NO_ROUTE_FOUND",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::InvalidRoute => "INVALID_ROUTE",
            ErrorKind::Geometry => "GEOMETRY",
            ErrorKind::ListenerFault => "LISTENER_FAULT",
            ErrorKind::RerouteLimit => "REROUTE_LIMIT",
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
