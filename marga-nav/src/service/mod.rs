//! Single-consumer command queue around a [`Director`].
//!
//! A named worker thread owns the Director and drains a bounded queue one
//! command at a time, so a location update (including any nested reroute)
//! always completes before the next command is looked at. Cancellation
//! bypasses the queue through the shared [`CancelToken`]: a route response
//! arriving after `cancel()` returns is never applied.

mod commands;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

pub use commands::{Command, NavigateReply};

use crate::director::{CancelToken, Director, Phase, Resolution};
use crate::error::{NavError, Result};
use crate::events::{GuidanceEvent, GuidanceListener, SubscriptionId};
use crate::geometry::Location;

/// Director state published after every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub step_index: Option<usize>,
    pub step_count: Option<usize>,
    pub location: Option<Location>,
    pub destination: Option<Location>,
}

impl StatusSnapshot {
    fn of(director: &Director) -> Self {
        Self {
            phase: director.phase(),
            step_index: director.step_index(),
            step_count: director.route().map(|r| r.len()),
            location: director.location(),
            destination: director.destination(),
        }
    }
}

pub type SharedStatus = Arc<RwLock<StatusSnapshot>>;

/// Owner of the worker thread.
pub struct DirectorService {
    handle: DirectorHandle,
    worker: Option<JoinHandle<()>>,
}

/// Cloneable front end to the worker.
#[derive(Clone)]
pub struct DirectorHandle {
    tx: Sender<Command>,
    cancel: CancelToken,
    status: SharedStatus,
}

impl DirectorService {
    /// Move `director` onto a worker thread with a queue of `capacity`.
    pub fn spawn(director: Director, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(NavError::Config("queue capacity must be non-zero".into()));
        }

        let (tx, rx) = bounded(capacity);
        let cancel = director.cancel_token();
        let status: SharedStatus = Arc::new(RwLock::new(StatusSnapshot::of(&director)));
        let worker_status = Arc::clone(&status);

        let worker = thread::Builder::new()
            .name("director".into())
            .spawn(move || run(director, rx, worker_status))?;

        info!("Director service started (queue capacity {})", capacity);
        Ok(Self {
            handle: DirectorHandle { tx, cancel, status },
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> DirectorHandle {
        self.handle.clone()
    }

    /// Stop the worker after the commands already queued, and join it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.handle.tx.send(Command::Shutdown);
            if worker.join().is_err() {
                warn!("Director worker panicked");
            }
            info!("Director service stopped");
        }
    }
}

impl Drop for DirectorService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::ops::Deref for DirectorService {
    type Target = DirectorHandle;

    fn deref(&self) -> &DirectorHandle {
        &self.handle
    }
}

impl DirectorHandle {
    /// Navigate and wait for the outcome.
    pub fn navigate(&self, destination: Location) -> Result<Resolution> {
        self.navigate_async(destination)?
            .recv()
            .map_err(|_| NavError::ServiceStopped)?
    }

    /// Queue a navigate; the reply arrives on the returned receiver.
    pub fn navigate_async(&self, destination: Location) -> Result<Receiver<Result<Resolution>>> {
        let (reply, rx) = bounded(1);
        self.send(Command::Navigate {
            destination,
            issued_epoch: self.cancel.epoch(),
            reply,
        })?;
        Ok(rx)
    }

    pub fn update_location(&self, fix: Location) -> Result<()> {
        self.send(Command::UpdateLocation(fix))
    }

    /// Cancel immediately, then queue the acknowledgement.
    ///
    /// Any route response still in flight is dropped when it returns.
    pub fn cancel(&self) -> Result<()> {
        self.cancel.cancel();
        self.send(Command::Cancel)
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status.read().clone()
    }

    /// Subscribe a listener on the worker; resolves once it is registered.
    pub fn subscribe(&self, listener: impl GuidanceListener + 'static) -> Result<SubscriptionId> {
        let (reply, rx) = bounded(1);
        self.send(Command::Subscribe {
            listener: Box::new(listener),
            reply,
        })?;
        rx.recv().map_err(|_| NavError::ServiceStopped)
    }

    pub fn subscribe_channel(&self) -> Result<Receiver<GuidanceEvent>> {
        let (reply, rx) = bounded(1);
        self.send(Command::SubscribeChannel { reply })?;
        rx.recv().map_err(|_| NavError::ServiceStopped)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| NavError::ServiceStopped)
    }
}

fn run(mut director: Director, rx: Receiver<Command>, status: SharedStatus) {
    for command in rx {
        debug!("Director command: {}", command.name());
        match command {
            Command::Navigate {
                destination,
                issued_epoch,
                reply,
            } => {
                let result = director.navigate_issued(destination, issued_epoch);
                let _ = reply.send(result);
            }
            Command::UpdateLocation(fix) => director.update_location(fix),
            Command::Cancel => director.sync_cancel(),
            Command::Subscribe { listener, reply } => {
                let _ = reply.send(director.events_mut().subscribe_boxed(listener));
            }
            Command::SubscribeChannel { reply } => {
                let _ = reply.send(director.events_mut().subscribe_channel());
            }
            Command::Shutdown => break,
        }
        *status.write() = StatusSnapshot::of(&director);
    }
    debug!("Director worker exiting");
}
