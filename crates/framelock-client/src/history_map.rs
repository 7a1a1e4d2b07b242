//! Unbounded map-backed snapshot history
//!
//! Entries are overwritten during rollback but never dropped unless the
//! session's retention window (or an explicit `evict_before`) says so. For bounded memory out of the box, use
//! `framelock-frame-buffer`'s ring buffer instead; both sit behind the same
//! `StateHistory` trait.

use framelock_core::{Frame, GameState, StateHistory};
use std::collections::BTreeMap;

/// Unbounded per-frame snapshot storage
#[derive(Debug, Clone, Default)]
pub struct MapHistory {
    entries: BTreeMap<Frame, GameState>,
}

impl MapHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateHistory for MapHistory {
    fn record(&mut self, frame: Frame, state: &GameState) {
        self.entries.insert(frame, state.clone());
    }

    fn state_at(&self, frame: Frame) -> Option<&GameState> {
        self.entries.get(&frame)
    }

    fn evict_before(&mut self, frame: Frame) {
        self.entries = self.entries.split_off(&frame);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn frame_range(&self) -> Option<(Frame, Frame)> {
        match (self.entries.keys().next(), self.entries.keys().next_back()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }
}
