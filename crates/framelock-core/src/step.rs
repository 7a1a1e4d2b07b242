//! The shared per-frame state transition
//!
//! Prediction and rollback resimulation both advance through this one
//! function; a frame replayed during rollback goes through exactly the same
//! code path it went through when first predicted.

use crate::{GameState, InputSet, TickDuration};

/// Advance a snapshot by one frame
///
/// Clones `state` and applies every `(player, input)` pair in the set to the
/// clone, in ascending `PlayerId` order (the `InputSet` iteration order).
/// The source snapshot is untouched, so a stored history entry can be used
/// as a rollback baseline any number of times.
pub fn step(state: &GameState, inputs: &InputSet, dt: TickDuration) -> GameState {
    let mut next = state.clone();
    for (player, input) in inputs {
        next.apply(*player, input, dt);
    }
    next
}
