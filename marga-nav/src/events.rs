//! Guidance events and the subscriber bus.
//!
//! The Director publishes every [`GuidanceEvent`] through an [`EventBus`].
//! Subscribers are either listeners called in place or channels drained by
//! another thread. A listener that returns an error or panics is isolated:
//! delivery to the remaining subscribers continues, and they are told about
//! the fault with `Error(ListenerFault)`.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::error::{ErrorKind, ListenerError};
use crate::geometry::Location;
use crate::route::{Route, Step};

/// Event emitted by the Director.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceEvent {
    /// Navigation requested, before the router resolves
    Navigate { destination: Location },
    /// A route was applied
    Route(Arc<Route>),
    /// A maneuver is due
    Step { index: usize, step: Step },
    /// The fix left the route corridor
    Deviation,
    /// The last step was announced
    Finish,
    /// Navigation was cancelled
    Cancel,
    Error(ErrorKind),
}

impl GuidanceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GuidanceEvent::Navigate { .. } => "navigate",
            GuidanceEvent::Route(_) => "route",
            GuidanceEvent::Step { .. } => "step",
            GuidanceEvent::Deviation => "deviation",
            GuidanceEvent::Finish => "finish",
            GuidanceEvent::Cancel => "cancel",
            GuidanceEvent::Error(_) => "error",
        }
    }
}

/// Receives guidance events in place.
pub trait GuidanceListener: Send {
    fn on_event(&mut self, event: &GuidanceEvent) -> Result<(), ListenerError>;
}

impl<F> GuidanceListener for F
where
    F: FnMut(&GuidanceEvent) + Send,
{
    fn on_event(&mut self, event: &GuidanceEvent) -> Result<(), ListenerError> {
        self(event);
        Ok(())
    }
}

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Sink {
    Listener(Box<dyn GuidanceListener>),
    Channel(Sender<GuidanceEvent>),
}

struct Subscriber {
    id: SubscriptionId,
    sink: Sink,
}

impl Subscriber {
    /// Deliver one event. `Ok(false)` means a channel receiver is gone.
    fn deliver(&mut self, event: &GuidanceEvent) -> Result<bool, ListenerError> {
        match &mut self.sink {
            Sink::Listener(listener) => {
                match catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                    Ok(result) => result.map(|_| true),
                    Err(payload) => Err(ListenerError::from_panic(payload)),
                }
            }
            Sink::Channel(tx) => Ok(tx.send(event.clone()).is_ok()),
        }
    }
}

/// Fan-out of guidance events to isolated subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    faults: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl GuidanceListener + 'static) -> SubscriptionId {
        self.subscribe_boxed(Box::new(listener))
    }

    pub fn subscribe_boxed(&mut self, listener: Box<dyn GuidanceListener>) -> SubscriptionId {
        self.add(Sink::Listener(listener))
    }

    /// Subscribe an unbounded channel; dropped receivers are pruned.
    pub fn subscribe_channel(&mut self) -> Receiver<GuidanceEvent> {
        let (tx, rx) = unbounded();
        self.add(Sink::Channel(tx));
        rx
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Listener faults seen so far.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn publish(&mut self, event: &GuidanceEvent) {
        let faulted = self.fan_out(event, &[]);
        if faulted.is_empty() {
            return;
        }

        let report = GuidanceEvent::Error(ErrorKind::ListenerFault);
        // Faults during the report are logged and counted only
        self.fan_out(&report, &faulted);
    }

    fn fan_out(&mut self, event: &GuidanceEvent, skip: &[SubscriptionId]) -> Vec<SubscriptionId> {
        let mut faulted = Vec::new();
        let mut closed = Vec::new();

        for sub in self.subscribers.iter_mut().filter(|s| !skip.contains(&s.id)) {
            match sub.deliver(event) {
                Ok(true) => {}
                Ok(false) => closed.push(sub.id),
                Err(e) => {
                    warn!("Listener {:?} faulted on {} event: {}", sub.id, event.name(), e);
                    faulted.push(sub.id);
                }
            }
        }

        self.faults += faulted.len() as u64;
        if !closed.is_empty() {
            self.subscribers.retain(|s| !closed.contains(&s.id));
        }
        faulted
    }

    fn add(&mut self, sink: Sink) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, sink });
        id
    }
}
