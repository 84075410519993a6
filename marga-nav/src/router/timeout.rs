//! Deadline wrapper for blocking routers.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, bounded};
use tracing::warn;

use super::Router;
use crate::error::RouterError;
use crate::geometry::Location;
use crate::route::Route;

/// Runs each call of an inner router on a helper thread and gives up after
/// `timeout`.
///
/// A timed-out call keeps running in the background; its result is
/// dropped.
pub struct TimeoutRouter {
    inner: Arc<dyn Router>,
    timeout: Duration,
}

impl TimeoutRouter {
    pub fn new(inner: Arc<dyn Router>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Router for TimeoutRouter {
    fn get_route(&self, start: Location, end: Location) -> Result<Vec<Route>, RouterError> {
        let (tx, rx) = bounded(1);
        let inner = Arc::clone(&self.inner);

        thread::Builder::new()
            .name("router-call".into())
            .spawn(move || {
                let _ = tx.send(inner.get_route(start, end));
            })
            .map_err(|e| RouterError::Transport(format!("failed to spawn router call: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Router call timed out after {} ms", self.timeout.as_millis());
                Err(RouterError::Transport(format!(
                    "timed out after {} ms",
                    self.timeout.as_millis()
                )))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(RouterError::Transport("router call panicked".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ScriptedRouter;

    struct SlowRouter(Duration);

    impl Router for SlowRouter {
        fn get_route(&self, _: Location, _: Location) -> Result<Vec<Route>, RouterError> {
            thread::sleep(self.0);
            Err(RouterError::NoRouteFound)
        }
    }

    struct PanickingRouter;

    impl Router for PanickingRouter {
        fn get_route(&self, _: Location, _: Location) -> Result<Vec<Route>, RouterError> {
            panic!("backend exploded");
        }
    }

    #[test]
    fn test_passes_through_fast_result() {
        let inner = Arc::new(ScriptedRouter::new());
        inner.push_response(Err(RouterError::NoRouteFound));
        let router = TimeoutRouter::new(inner, Duration::from_secs(5));
        let p = Location::new(0.0, 0.0);
        assert_eq!(router.get_route(p, p), Err(RouterError::NoRouteFound));
    }

    #[test]
    fn test_timeout_is_transport_error() {
        let router = TimeoutRouter::new(
            Arc::new(SlowRouter(Duration::from_millis(500))),
            Duration::from_millis(20),
        );
        let p = Location::new(0.0, 0.0);
        match router.get_route(p, p) {
            Err(RouterError::Transport(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_panic_is_transport_error() {
        let router = TimeoutRouter::new(Arc::new(PanickingRouter), Duration::from_secs(5));
        let p = Location::new(0.0, 0.0);
        assert!(matches!(
            router.get_route(p, p),
            Err(RouterError::Transport(_))
        ));
    }
}
