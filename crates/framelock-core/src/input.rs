//! Per-tick player commands

use crate::{PlayerId, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single player's command for one tick
///
/// A plain value: fully copyable, equality-comparable, and never aliased
/// across history slots. Prediction, the authoritative record, and the local
/// input log all store independent copies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Desired movement direction (normalized by the transition function)
    pub direction: Vec3,
}

impl PlayerInput {
    /// Create a movement command
    pub fn new(direction: Vec3) -> Self {
        Self { direction }
    }

    /// The do-nothing command
    pub fn idle() -> Self {
        Self::default()
    }

    /// Whether this command moves the player at all
    pub fn is_idle(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

/// The set of inputs applied within a single frame, keyed by player
///
/// A `BTreeMap` rather than a hash map: iterating an input set always yields
/// players in ascending id order, which makes multi-player application
/// deterministic without any extra sorting at the call sites.
pub type InputSet = BTreeMap<PlayerId, PlayerInput>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        assert!(PlayerInput::idle().is_idle());
        assert!(!PlayerInput::new(Vec3::RIGHT).is_idle());
    }

    #[test]
    fn test_input_set_iterates_in_ascending_id_order() {
        let mut set = InputSet::new();
        set.insert(PlayerId::new(3), PlayerInput::idle());
        set.insert(PlayerId::new(1), PlayerInput::idle());
        set.insert(PlayerId::new(2), PlayerInput::idle());

        let order: Vec<u32> = set.keys().map(|p| p.raw()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
