//! Discrete simulation time
//!
//! Frames are the only time axis the simulation knows about. Frame 0 is the
//! immutable initial snapshot seeded at session construction; simulation
//! frames start at 1 and increase by exactly one per tick.

use serde::{Deserialize, Serialize};

/// A discrete frame index (logical time unit)
///
/// Frame indices are totally ordered and are the sole key correlating
/// states, local inputs, and authoritative records across the workspace.
pub type Frame = u64;

/// The fixed duration of one simulation tick
///
/// Supplied by the external tick driver at session construction. The
/// state-transition function reads no other time source; a fixed dt is what
/// keeps two clients' transitions bit-identical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickDuration(f32);

impl TickDuration {
    /// Create from a duration in seconds
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is not strictly positive and finite.
    pub fn from_secs(seconds: f32) -> Self {
        assert!(
            seconds > 0.0 && seconds.is_finite(),
            "Tick duration must be positive and finite"
        );
        Self(seconds)
    }

    /// Create from a tick rate in Hz (ticks per second)
    ///
    /// # Panics
    ///
    /// Panics if `hz` is not strictly positive and finite.
    pub fn from_hz(hz: f32) -> Self {
        assert!(hz > 0.0 && hz.is_finite(), "Tick rate must be positive and finite");
        Self(1.0 / hz)
    }

    /// Get the duration in seconds
    pub fn as_secs(&self) -> f32 {
        self.0
    }
}

impl Default for TickDuration {
    /// 60 ticks per second
    fn default() -> Self {
        Self::from_hz(60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hz() {
        let dt = TickDuration::from_hz(50.0);
        assert_eq!(dt.as_secs(), 0.02);
    }

    #[test]
    fn test_default_is_60hz() {
        let dt = TickDuration::default();
        assert_eq!(dt, TickDuration::from_hz(60.0));
    }

    #[test]
    #[should_panic]
    fn test_zero_duration_rejected() {
        TickDuration::from_secs(0.0);
    }
}
