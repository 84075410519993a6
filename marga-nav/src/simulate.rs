//! Simulated position feed.
//!
//! Replays equally spaced points along a route's line as fixes, stopping
//! once the Director reports finish or cancel.

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::director::{Director, Phase};
use crate::error::Result;
use crate::events::GuidanceEvent;
use crate::geometry::{Location, sample_along};
use crate::route::Route;
use crate::service::DirectorHandle;

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Fixes fed to the Director
    pub sent: usize,
    /// Fixes available
    pub total: usize,
    /// Whether `Finish` or `Cancel` cut the replay short
    pub stopped: bool,
}

/// Fix generator driven by [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct Simulator {
    points: usize,
    interval: Duration,
}

impl Simulator {
    pub fn new(points: usize, interval: Duration) -> Self {
        Self { points, interval }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.points, config.interval())
    }

    /// Fixes along the full route line.
    pub fn fixes_for(&self, route: &Route) -> Vec<Location> {
        sample_along(route.geometry(), self.points)
    }

    /// Feed `fixes` straight into a Director on this thread.
    pub fn replay_direct(&self, director: &mut Director, fixes: &[Location]) -> ReplaySummary {
        let mut sent = 0;
        for &fix in fixes {
            director.update_location(fix);
            sent += 1;
            if matches!(director.phase(), Phase::Finished | Phase::Cancelled) {
                return self.summary(sent, fixes.len(), true);
            }
            self.pause();
        }
        self.summary(sent, fixes.len(), false)
    }

    /// Feed `fixes` through a running service.
    ///
    /// The finish/cancel check sees events as the worker publishes them, so
    /// a fix or two already queued may still be delivered.
    pub fn replay(&self, handle: &DirectorHandle, fixes: &[Location]) -> Result<ReplaySummary> {
        let events = handle.subscribe_channel()?;
        let mut sent = 0;
        for &fix in fixes {
            let ended = events
                .try_iter()
                .any(|e| matches!(e, GuidanceEvent::Finish | GuidanceEvent::Cancel));
            if ended {
                return Ok(self.summary(sent, fixes.len(), true));
            }
            handle.update_location(fix)?;
            sent += 1;
            self.pause();
        }
        Ok(self.summary(sent, fixes.len(), false))
    }

    fn pause(&self) {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
    }

    fn summary(&self, sent: usize, total: usize, stopped: bool) -> ReplaySummary {
        if stopped {
            info!("Simulation stopped after {}/{} fixes", sent, total);
        } else {
            debug!("Simulation fed all {} fixes", total);
        }
        ReplaySummary {
            sent,
            total,
            stopped,
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
