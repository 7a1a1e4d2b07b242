//! Snapshot value types and the per-player transition

use crate::{Frame, PlayerId, PlayerInput, TickDuration, Vec3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Movement speed in units per second
pub const MOVE_SPEED: f32 = 5.0;

/// Per-player simulation state
///
/// Evolves only through [`GameState::apply`]; nothing else writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// World position
    pub position: Vec3,
}

/// A complete simulation snapshot
///
/// `Clone` is a true deep copy: `IndexMap` clones its entries and every
/// nested field is a plain value, so two snapshots never share mutable
/// memory. History storage and rollback both depend on that.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// All players, keyed by id
    pub players: IndexMap<PlayerId, PlayerState>,
}

impl GameState {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot with the given players seeded at the origin
    pub fn with_players(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut state = Self::new();
        for id in ids {
            state.add_player(id);
        }
        state
    }

    /// Add a player at the origin
    pub fn add_player(&mut self, id: PlayerId) {
        self.players.insert(id, PlayerState::default());
    }

    /// Get a player's state
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    /// Apply one player's input for one tick
    ///
    /// Mutates exactly the addressed player's fields as a pure function of
    /// `(state, input, dt)`. Input addressed to a player not present in the
    /// snapshot is ignored; the frame still advances identically on every
    /// client because presence itself is part of the snapshot.
    pub fn apply(&mut self, player: PlayerId, input: &PlayerInput, dt: TickDuration) {
        let movement = input.direction.normalized() * (MOVE_SPEED * dt.as_secs());
        if let Some(state) = self.players.get_mut(&player) {
            state.position += movement;
        }
    }

    /// Number of players in the snapshot
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// A snapshot paired with the frame it belongs to
///
/// The read-only observability surface: what a session hands out for
/// periodic external logging without exposing its owned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Frame the snapshot was produced at
    pub frame: Frame,
    /// The snapshot itself (an independent copy)
    pub state: GameState,
}
