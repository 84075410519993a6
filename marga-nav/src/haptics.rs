//! Vibration feedback for guidance events.
//!
//! Patterns alternate pause and pulse durations in milliseconds, starting
//! with a pause. A step plays the turn pulse followed by the modifier's
//! signature; depart and arrive play one long pulse.

use crate::error::ListenerError;
use crate::events::{GuidanceEvent, GuidanceListener};
use crate::route::{Maneuver, ManeuverKind, Modifier};

/// Base pause between pulses (ms).
pub const WAIT_MS: u64 = 500;

pub const DEVIATION: [u64; 6] = [1000, 1000, 1000, 1000, 1000, 1000];
pub const DEPART: [u64; 2] = [WAIT_MS, 2000];
pub const ARRIVE: [u64; 2] = [WAIT_MS, 2000];
pub const TURN: [u64; 2] = [WAIT_MS, 1000];

pub const RIGHT: [u64; 2] = [WAIT_MS * 2, 200];
pub const LEFT: [u64; 6] = [WAIT_MS * 2, 200, WAIT_MS, 200, WAIT_MS, 200];
pub const STRAIGHT: [u64; 4] = [WAIT_MS * 2, 200, WAIT_MS, 200];

/// Vibration output.
pub trait Vibrate: Send {
    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), ListenerError>;
}

impl<F> Vibrate for F
where
    F: FnMut(&[u64]) + Send,
{
    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), ListenerError> {
        self(pattern);
        Ok(())
    }
}

/// Modifier signature; sharp and slight variants share their direction's.
fn modifier_signature(modifier: Modifier) -> Option<&'static [u64]> {
    match modifier {
        Modifier::Right | Modifier::SharpRight | Modifier::SlightRight => Some(&RIGHT),
        Modifier::Left | Modifier::SharpLeft | Modifier::SlightLeft => Some(&LEFT),
        Modifier::Straight => Some(&STRAIGHT),
        Modifier::Uturn => None,
    }
}

/// Pattern announcing `maneuver`.
pub fn pattern_for(maneuver: &Maneuver) -> Result<Vec<u64>, ListenerError> {
    match maneuver.kind {
        ManeuverKind::Depart => Ok(DEPART.to_vec()),
        ManeuverKind::Arrive => Ok(ARRIVE.to_vec()),
        _ => {
            let signature = maneuver.modifier.and_then(modifier_signature).ok_or_else(|| {
                ListenerError::Failed(format!(
                    "no vibration pattern for {} {}",
                    maneuver.kind,
                    maneuver.modifier.map_or("(no modifier)", |m| m.as_str())
                ))
            })?;
            Ok(TURN.iter().chain(signature).copied().collect())
        }
    }
}

/// Plays patterns for `Step` and `Deviation` events.
pub struct HapticListener<V> {
    output: V,
}

impl<V: Vibrate> HapticListener<V> {
    pub fn new(output: V) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> V {
        self.output
    }
}

impl<V: Vibrate> GuidanceListener for HapticListener<V> {
    fn on_event(&mut self, event: &GuidanceEvent) -> Result<(), ListenerError> {
        match event {
            GuidanceEvent::Step { step, .. } => {
                let pattern = pattern_for(&step.maneuver)?;
                self.output.vibrate(&pattern)
            }
            GuidanceEvent::Deviation => self.output.vibrate(&DEVIATION),
            _ => Ok(()),
        }
    }
}
