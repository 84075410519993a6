//! Route-matching state machine.
//!
//! ```text
//!            navigate            route applied
//!   Idle ───────────▶ Routing ───────────────▶ Navigating ◀──┐
//!    ▲                                         │   │         │ reroute
//!    │ next navigate          last step        │   │ deviation applied/failed
//!    └──── Finished ◀──────────────────────────┘   ▼         │
//!          Cancelled ◀─── cancel (any phase)     Rerouting ──┘
//! ```

#[allow(clippy::module_inception)]
mod director;
mod matcher;
mod state;

pub use director::Director;
pub use matcher::{Evaluation, RouteTracker};
pub use state::{CancelToken, Phase, Resolution};
