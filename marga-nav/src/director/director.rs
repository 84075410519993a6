//! The route-matching state machine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::matcher::{Evaluation, RouteTracker};
use super::state::{CancelToken, Guidance, Phase, Resolution};
use crate::config::DirectorConfig;
use crate::error::{ErrorKind, NavError, Result, RouterError};
use crate::events::{EventBus, GuidanceEvent};
use crate::geometry::Location;
use crate::route::Route;
use crate::router::Router;

/// Turn-by-turn guidance for one traveler.
///
/// Single actor: every method takes `&mut self` and runs to completion,
/// including any router call. Only the [`CancelToken`] may be touched from
/// other threads; wrap the Director in a
/// [`DirectorService`](crate::service::DirectorService) to feed it from
/// several producers.
pub struct Director {
    router: Arc<dyn Router>,
    config: DirectorConfig,
    events: EventBus,
    location: Option<Location>,
    guidance: Guidance,
    phase: Phase,
    cancel: CancelToken,
    /// Last cancel epoch acted upon
    seen_epoch: u64,
}

impl Director {
    pub fn new(router: Arc<dyn Router>, config: DirectorConfig) -> Result<Self> {
        config.validate()?;
        let cancel = CancelToken::new();
        let seen_epoch = cancel.epoch();
        Ok(Self {
            router,
            config,
            events: EventBus::new(),
            location: None,
            guidance: Guidance::Idle,
            phase: Phase::Idle,
            cancel,
            seen_epoch,
        })
    }

    /// Seed the start position without matching.
    pub fn with_location(mut self, location: Location) -> Result<Self> {
        self.set_location(location)?;
        Ok(self)
    }

    pub fn set_location(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        self.location = Some(location);
        Ok(())
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn destination(&self) -> Option<Location> {
        match &self.guidance {
            Guidance::Idle => None,
            Guidance::Navigating { destination, .. } => Some(*destination),
        }
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        match &self.guidance {
            Guidance::Idle => None,
            Guidance::Navigating { tracker, .. } => Some(tracker.route()),
        }
    }

    pub fn step_index(&self) -> Option<usize> {
        match &self.guidance {
            Guidance::Idle => None,
            Guidance::Navigating { step_index, .. } => Some(*step_index),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_navigating(&self) -> bool {
        matches!(self.guidance, Guidance::Navigating { .. })
    }

    /// Request a route from the current location to `destination`.
    ///
    /// Emits `Navigate` before calling the router and `Route` once the new
    /// route is active. On failure the previous navigation, if any, is kept
    /// and the error is returned.
    pub fn navigate(&mut self, destination: Location) -> Result<Resolution> {
        let epoch = self.cancel.epoch();
        self.navigate_issued(destination, epoch)
    }

    /// [`navigate`](Self::navigate) for a request issued when the cancel
    /// epoch was `issued_epoch`. A cancel since then discards the request.
    pub fn navigate_issued(&mut self, destination: Location, issued_epoch: u64) -> Result<Resolution> {
        self.sync_cancel();
        if self.cancel.epoch() != issued_epoch {
            debug!("Navigate request cancelled before it started");
            return Ok(Resolution::Discarded);
        }

        destination.validate()?;
        let start = self.location.ok_or(NavError::NoLocation)?;

        info!(
            "Navigate requested: ({:.6}, {:.6}) -> ({:.6}, {:.6})",
            start.lon, start.lat, destination.lon, destination.lat
        );
        self.events.publish(&GuidanceEvent::Navigate { destination });

        let previous = self.phase;
        self.phase = Phase::Routing;

        match self.resolve(start, destination, issued_epoch) {
            Ok(Some(tracker)) => {
                self.apply(destination, tracker);
                Ok(Resolution::Applied)
            }
            Ok(None) => {
                self.sync_cancel();
                Ok(Resolution::Discarded)
            }
            Err(e) => {
                warn!("Navigate failed: {}", e);
                self.phase = previous;
                Err(e)
            }
        }
    }

    /// Feed one position fix.
    ///
    /// Never fails: problems are reported as `Error` events and the current
    /// navigation is kept.
    pub fn update_location(&mut self, fix: Location) {
        if let Err(e) = fix.validate() {
            warn!("Rejected fix: {}", e);
            self.events.publish(&GuidanceEvent::Error(ErrorKind::Geometry));
            return;
        }
        self.location = Some(fix);
        self.sync_cancel();

        let mut reroutes = 0;
        loop {
            let (destination, evaluation) = match &self.guidance {
                Guidance::Idle => return,
                Guidance::Navigating {
                    destination,
                    tracker,
                    step_index,
                } => (
                    *destination,
                    tracker.evaluate(fix, *step_index, self.config.lead_distance_m),
                ),
            };

            match evaluation {
                Ok(Evaluation::Deviated) => {
                    info!("Deviation at ({:.6}, {:.6})", fix.lon, fix.lat);
                    self.events.publish(&GuidanceEvent::Deviation);

                    if reroutes >= self.config.max_reroutes_per_fix {
                        warn!("Reroute limit of {} reached for this fix", reroutes);
                        self.phase = Phase::Navigating;
                        self.events
                            .publish(&GuidanceEvent::Error(ErrorKind::RerouteLimit));
                        return;
                    }
                    reroutes += 1;

                    match self.reroute(fix, destination) {
                        Ok(Resolution::Applied) => continue,
                        Ok(Resolution::Discarded) => return,
                        Err(e) => {
                            warn!("Reroute failed, keeping current route: {}", e);
                            self.phase = Phase::Navigating;
                            self.events.publish(&GuidanceEvent::Error(e.kind()));
                            return;
                        }
                    }
                }
                Ok(Evaluation::Announce(index)) => {
                    self.announce(index);
                    return;
                }
                Ok(Evaluation::Approaching { index, distance_m }) => {
                    debug!("Step {} maneuver {:.1} m away", index, distance_m);
                    return;
                }
                Ok(Evaluation::Unmatched) => return,
                Err(e) => {
                    warn!("Matching failed: {}", e);
                    self.events.publish(&GuidanceEvent::Error(ErrorKind::Geometry));
                    return;
                }
            }
        }
    }

    /// Cancel now. Emits `Cancel` even when idle.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.sync_cancel();
    }

    /// Act on a cancel requested through the token, if one is pending.
    ///
    /// Several cancels since the last sync produce one `Cancel` event.
    pub fn sync_cancel(&mut self) {
        let epoch = self.cancel.epoch();
        if epoch == self.seen_epoch {
            return;
        }
        self.seen_epoch = epoch;

        info!("Navigation cancelled");
        self.guidance = Guidance::Idle;
        self.phase = Phase::Cancelled;
        self.events.publish(&GuidanceEvent::Cancel);
    }

    fn reroute(&mut self, start: Location, destination: Location) -> Result<Resolution> {
        let issued = self.seen_epoch;
        let previous = self.phase;
        self.phase = Phase::Rerouting;

        match self.resolve(start, destination, issued) {
            Ok(Some(tracker)) => {
                self.apply(destination, tracker);
                Ok(Resolution::Applied)
            }
            Ok(None) => {
                self.sync_cancel();
                Ok(Resolution::Discarded)
            }
            Err(e) => {
                self.phase = previous;
                Err(e)
            }
        }
    }

    /// Call the router and build a tracker for its first route.
    ///
    /// `Ok(None)` means a cancel arrived during the call and the response
    /// was dropped. The Director is borrowed for the whole call, so the
    /// cancel epoch is the only state that can change meanwhile.
    fn resolve(
        &self,
        start: Location,
        destination: Location,
        issued_epoch: u64,
    ) -> Result<Option<RouteTracker>> {
        let response = self.router.get_route(start, destination);

        if self.cancel.epoch() != issued_epoch {
            info!("Discarding route response for cancelled navigation");
            return Ok(None);
        }

        let route = response?
            .into_iter()
            .next()
            .ok_or(RouterError::NoRouteFound)?;
        let tracker = RouteTracker::build(Arc::new(route), self.config.corridor_width_m)?;
        Ok(Some(tracker))
    }

    fn apply(&mut self, destination: Location, tracker: RouteTracker) {
        let route = Arc::clone(tracker.route());
        info!(
            "Route applied: {} steps, {:.0} m",
            route.len(),
            route.distance_m()
        );
        self.guidance = Guidance::Navigating {
            destination,
            tracker,
            step_index: 0,
        };
        self.phase = Phase::Navigating;
        self.events.publish(&GuidanceEvent::Route(route));
    }

    fn announce(&mut self, index: usize) {
        let Guidance::Navigating {
            tracker,
            step_index,
            ..
        } = &mut self.guidance
        else {
            return;
        };
        let route = Arc::clone(tracker.route());
        let Some(step) = route.step(index) else {
            return;
        };

        *step_index = index + 1;
        let finished = *step_index >= route.len();

        info!("Step {} announced: {}", index, step.name);
        self.events.publish(&GuidanceEvent::Step {
            index,
            step: step.clone(),
        });

        if finished {
            info!("Route finished");
            self.guidance = Guidance::Idle;
            self.phase = Phase::Finished;
            self.events.publish(&GuidanceEvent::Finish);
        }
    }
}
