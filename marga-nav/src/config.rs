//! Configuration loading for MargaNav

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub director: DirectorConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Route matching parameters
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DirectorConfig {
    /// Announce a maneuver once within this distance (meters, default: 20)
    #[serde(default = "default_lead_distance")]
    pub lead_distance_m: f64,

    /// Corridor buffer around route and step lines (meters, default: 50)
    #[serde(default = "default_corridor_width")]
    pub corridor_width_m: f64,

    /// Reroute attempts allowed while handling one fix (default: 3)
    #[serde(default = "default_max_reroutes")]
    pub max_reroutes_per_fix: u32,
}

/// Router collaborator settings
#[derive(Clone, Debug, Deserialize)]
pub struct RouterConfig {
    /// Per-request deadline in milliseconds (default: 5000)
    #[serde(default = "default_router_timeout")]
    pub timeout_ms: u64,
}

/// Command queue settings
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
    /// Bounded command queue length (default: 64)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Simulated fix feed
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    /// Fixes sampled along the route (default: 20)
    #[serde(default = "default_sim_points")]
    pub points: usize,

    /// Delay between fixes in milliseconds (default: 0)
    #[serde(default)]
    pub interval_ms: u64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            lead_distance_m: default_lead_distance(),
            corridor_width_m: default_corridor_width(),
            max_reroutes_per_fix: default_max_reroutes(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_router_timeout(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            points: default_sim_points(),
            interval_ms: 0,
        }
    }
}

// Default value functions
fn default_lead_distance() -> f64 {
    20.0
}
fn default_corridor_width() -> f64 {
    50.0
}
fn default_max_reroutes() -> u32 {
    3
}
fn default_router_timeout() -> u64 {
    5000
}
fn default_queue_capacity() -> usize {
    64
}
fn default_sim_points() -> usize {
    20
}

impl DirectorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.lead_distance_m.is_finite() || self.lead_distance_m <= 0.0 {
            return Err(NavError::Config(format!(
                "lead_distance_m must be positive, got {}",
                self.lead_distance_m
            )));
        }
        if !self.corridor_width_m.is_finite() || self.corridor_width_m <= 0.0 {
            return Err(NavError::Config(format!(
                "corridor_width_m must be positive, got {}",
                self.corridor_width_m
            )));
        }
        if !(10.0..=200.0).contains(&self.corridor_width_m) {
            warn!(
                "corridor_width_m = {} is outside the usual 10-200 m range",
                self.corridor_width_m
            );
        }
        Ok(())
    }
}

impl RouterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SimulationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject values the Director or service cannot run with
    pub fn validate(&self) -> Result<()> {
        self.director.validate()?;
        if self.router.timeout_ms == 0 {
            return Err(NavError::Config("router.timeout_ms must be non-zero".into()));
        }
        if self.service.queue_capacity == 0 {
            return Err(NavError::Config(
                "service.queue_capacity must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
