//! Director state types.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::matcher::RouteTracker;
use crate::geometry::Location;

/// Observable phase of the Director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No destination.
    #[default]
    Idle,

    /// Caller-initiated navigate waiting on the router.
    Routing,

    /// Matching fixes against a route.
    Navigating,

    /// Deviation detected, waiting on a replacement route.
    Rerouting,

    /// Last step announced. No destination.
    Finished,

    /// Navigation cancelled. No destination.
    Cancelled,
}

impl Phase {
    /// Check if there is a destination being worked towards.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Phase::Routing | Phase::Navigating | Phase::Rerouting
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Routing => "ROUTING",
            Phase::Navigating => "NAVIGATING",
            Phase::Rerouting => "REROUTING",
            Phase::Finished => "FINISHED",
            Phase::Cancelled => "CANCELLED",
        }
    }
}

/// Outcome of a route request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The new route is active.
    Applied,
    /// Navigation was cancelled while the router was working; the response
    /// was dropped.
    Discarded,
}

/// Active navigation, or none.
///
/// The route and its step cursor live together in the tracker variant so
/// they are always replaced as one value.
#[derive(Debug, Default)]
pub(crate) enum Guidance {
    #[default]
    Idle,
    Navigating {
        destination: Location,
        tracker: RouteTracker,
        /// Next step eligible for announcement; `steps.len()` once complete
        step_index: usize,
    },
}

/// Cancellation epoch shared between the Director and its callers.
///
/// `cancel()` bumps the epoch from any thread. A router response is applied
/// only if the epoch has not moved since the request was issued.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicU64>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of whatever navigation is current.
    pub fn cancel(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn epoch(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}
