//! Framelock Core - Deterministic lockstep state model
//!
//! This crate provides the value types and the pure state-transition function
//! that the rest of the workspace builds on:
//!
//! - `Frame` and `TickDuration` - discrete simulation time
//! - `PlayerId`, `PlayerInput`, `InputSet` - per-tick commands
//! - `PlayerState`, `GameState` - snapshot value types
//! - `step` - the per-frame transition shared by prediction and rollback
//! - `StateHistory` - trait seam for snapshot storage backends
//!
//! # Determinism
//!
//! Everything in this crate is a pure function of its arguments. There is no
//! randomness, no wall-clock access, and no iteration over unordered maps:
//! input sets are `BTreeMap`s so multi-player application always happens in
//! ascending `PlayerId` order. Two machines stepping equal snapshots with
//! equal input sets produce bit-identical snapshots, which is the property
//! the whole rollback scheme rests on.

mod frame;
mod history;
mod input;
mod math;
mod player;
mod state;
mod step;

pub use frame::{Frame, TickDuration};
pub use history::StateHistory;
pub use input::{InputSet, PlayerInput};
pub use math::Vec3;
pub use player::PlayerId;
pub use state::{FrameSnapshot, GameState, PlayerState, MOVE_SPEED};
pub use step::step;
