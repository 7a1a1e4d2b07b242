//! Local input collection
//!
//! The session pulls the local player's command for each new frame through
//! the [`InputSource`] trait. In production this is live device input (which
//! is exactly why confirmation and rollback exist); in tests it is a
//! deterministic function of the frame.

use framelock_core::{Frame, PlayerInput, Vec3};

/// Supplies the local player's input for a given frame.
pub trait InputSource {
    /// Produce the input for `frame`.
    ///
    /// Called exactly once per frame, at the tick that first advances to it.
    fn sample(&mut self, frame: Frame) -> PlayerInput;
}

impl<F> InputSource for F
where
    F: FnMut(Frame) -> PlayerInput,
{
    fn sample(&mut self, frame: Frame) -> PlayerInput {
        self(frame)
    }
}

/// Placeholder policy: never any input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn sample(&mut self, _frame: Frame) -> PlayerInput {
        PlayerInput::idle()
    }
}

/// Demo policy: move on even frames, idle on odd frames.
#[derive(Debug, Clone, Copy)]
pub struct Alternating {
    /// Direction to move on even frames
    pub direction: Vec3,
}

impl Alternating {
    /// Alternate between moving in `direction` and standing still
    pub fn new(direction: Vec3) -> Self {
        Self { direction }
    }
}

impl Default for Alternating {
    fn default() -> Self {
        Self::new(Vec3::RIGHT)
    }
}

impl InputSource for Alternating {
    fn sample(&mut self, frame: Frame) -> PlayerInput {
        if frame % 2 == 0 {
            PlayerInput::new(self.direction)
        } else {
            PlayerInput::idle()
        }
    }
}
