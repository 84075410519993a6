//! Scripted router for tests and demos.

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;

use super::Router;
use crate::error::RouterError;
use crate::geometry::Location;
use crate::route::Route;

type Response = Result<Vec<Route>, RouterError>;

/// Router that replays scripted responses in order.
///
/// The last queued response repeats for every later call. With nothing
/// queued, calls fail with a transport error.
#[derive(Default)]
pub struct ScriptedRouter {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<(Location, Location)>>,
    gate: Mutex<Option<Gate>>,
}

struct Gate {
    entered_tx: Sender<()>,
    release_rx: Receiver<()>,
}

/// Holds the next router call until released or dropped.
pub struct RouteHold {
    entered_rx: Receiver<()>,
    release_tx: Option<Sender<()>>,
}

impl RouteHold {
    /// Wait until the held call has started.
    pub fn wait_entered(&self, timeout: Duration) -> bool {
        self.entered_rx.recv_timeout(timeout).is_ok()
    }

    /// Let the held call proceed.
    pub fn release(mut self) {
        if let Some(tx) = self.release_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RouteHold {
    fn drop(&mut self) {
        // Dropping the sender also wakes the held call
        self.release_tx.take();
    }
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router that always answers with `routes`.
    pub fn with_routes(routes: Vec<Route>) -> Self {
        let router = Self::new();
        router.push_response(Ok(routes));
        router
    }

    /// Queue a response.
    pub fn push_response(&self, response: Result<Vec<Route>, RouterError>) {
        self.responses.lock().push_back(response);
    }

    /// Replace all queued responses with a single one.
    pub fn set_response(&self, response: Result<Vec<Route>, RouterError>) {
        let mut responses = self.responses.lock();
        responses.clear();
        responses.push_back(response);
    }

    /// Block the next call inside the router until the hold is released.
    pub fn hold(&self) -> RouteHold {
        let (entered_tx, entered_rx) = bounded(1);
        let (release_tx, release_rx) = bounded(1);
        *self.gate.lock() = Some(Gate {
            entered_tx,
            release_rx,
        });
        RouteHold {
            entered_rx,
            release_tx: Some(release_tx),
        }
    }

    /// `(start, end)` of every call so far.
    pub fn requests(&self) -> Vec<(Location, Location)> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_response(&self) -> Response {
        let mut responses = self.responses.lock();
        if responses.len() > 1 {
            responses
                .pop_front()
                .unwrap_or_else(|| Err(RouterError::Transport("no scripted response".into())))
        } else {
            responses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(RouterError::Transport("no scripted response".into())))
        }
    }
}

impl Router for ScriptedRouter {
    fn get_route(&self, start: Location, end: Location) -> Result<Vec<Route>, RouterError> {
        self.requests.lock().push((start, end));

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.entered_tx.send(());
            // Err means the hold was dropped
            let _ = gate.release_rx.recv();
        }

        self.next_response()
    }
}
