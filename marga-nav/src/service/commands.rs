//! Command types for the Director worker.
//!
//! Commands that need an answer carry a one-slot reply channel.

use crossbeam_channel::Sender;

use crate::director::Resolution;
use crate::error::Result;
use crate::events::{GuidanceEvent, GuidanceListener, SubscriptionId};
use crate::geometry::Location;

/// Reply to a navigate command.
pub type NavigateReply = Sender<Result<Resolution>>;

/// Commands processed by the Director worker, one at a time.
pub enum Command {
    /// Route from the current location to `destination`.
    Navigate {
        destination: Location,
        /// Cancel epoch when the caller issued the request
        issued_epoch: u64,
        reply: NavigateReply,
    },

    /// Match one position fix.
    UpdateLocation(Location),

    /// Acknowledge a cancel already signalled through the token.
    Cancel,

    /// Register an in-place listener.
    Subscribe {
        listener: Box<dyn GuidanceListener>,
        reply: Sender<SubscriptionId>,
    },

    /// Register a channel subscriber.
    SubscribeChannel {
        reply: Sender<crossbeam_channel::Receiver<GuidanceEvent>>,
    },

    /// Stop the worker.
    Shutdown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Navigate { .. } => "navigate",
            Command::UpdateLocation(_) => "update_location",
            Command::Cancel => "cancel",
            Command::Subscribe { .. } => "subscribe",
            Command::SubscribeChannel { .. } => "subscribe_channel",
            Command::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Navigate {
                destination,
                issued_epoch,
                ..
            } => f
                .debug_struct("Navigate")
                .field("destination", destination)
                .field("issued_epoch", issued_epoch)
                .field("reply", &"...")
                .finish(),
            Command::UpdateLocation(fix) => f.debug_tuple("UpdateLocation").field(fix).finish(),
            other => f.write_str(other.name()),
        }
    }
}
