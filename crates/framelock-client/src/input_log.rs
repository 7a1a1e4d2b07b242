//! Per-frame record of the local player's input
//!
//! For each frame the log holds the input that was actually used when the
//! frame was predicted or last resimulated. Rollback overwrites the entry at
//! the confirmed frame with the authoritative value, so every later rollback
//! that replays through that frame sees the confirmed input instead of the
//! stale prediction.

use framelock_core::{Frame, PlayerInput};
use std::collections::BTreeMap;

/// Append-mostly log of local inputs, keyed by frame
#[derive(Debug, Clone, Default)]
pub struct InputLog {
    entries: BTreeMap<Frame, PlayerInput>,
}

impl InputLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the input used for a frame, overwriting any existing entry
    pub fn record(&mut self, frame: Frame, input: PlayerInput) {
        self.entries.insert(frame, input);
    }

    /// Get the input recorded for a frame
    pub fn get(&self, frame: Frame) -> Option<PlayerInput> {
        self.entries.get(&frame).copied()
    }

    /// Drop all entries strictly before the given frame
    pub fn evict_before(&mut self, frame: Frame) {
        self.entries = self.entries.split_off(&frame);
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest recorded frame
    pub fn newest_frame(&self) -> Option<Frame> {
        self.entries.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelock_core::Vec3;

    #[test]
    fn test_record_and_get() {
        let mut log = InputLog::new();
        log.record(1, PlayerInput::idle());
        log.record(2, PlayerInput::new(Vec3::RIGHT));

        assert_eq!(log.get(1), Some(PlayerInput::idle()));
        assert_eq!(log.get(2), Some(PlayerInput::new(Vec3::RIGHT)));
        assert_eq!(log.get(3), None);
        assert_eq!(log.newest_frame(), Some(2));
    }

    #[test]
    fn test_record_overwrites() {
        let mut log = InputLog::new();
        log.record(5, PlayerInput::idle());
        log.record(5, PlayerInput::new(Vec3::UP));

        assert_eq!(log.len(), 1);
        assert_eq!(log.get(5), Some(PlayerInput::new(Vec3::UP)));
    }

    #[test]
    fn test_evict_before() {
        let mut log = InputLog::new();
        for frame in 1..=5 {
            log.record(frame, PlayerInput::idle());
        }
        log.evict_before(3);

        assert_eq!(log.get(2), None);
        assert!(log.get(3).is_some());
        assert_eq!(log.len(), 3);
    }
}
