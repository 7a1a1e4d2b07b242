//! In-memory reference implementation of the input store

use crate::InputStore;
use framelock_core::{Frame, InputSet, PlayerId, PlayerInput};
use std::collections::BTreeMap;

/// In-process authoritative input registry
///
/// Frame availability is immediate: a frame is released as soon as at least
/// one input for it has been recorded. The fixed end-to-end confirmation
/// delay is simulated by the polling client, which only ever asks for
/// `current_frame - delay`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Recorded inputs: frame -> (player -> input)
    record: BTreeMap<Frame, InputSet>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames with at least one recorded input
    pub fn frame_count(&self) -> usize {
        self.record.len()
    }

    /// Whether any input has been recorded for a frame
    pub fn contains(&self, frame: Frame) -> bool {
        self.record.contains_key(&frame)
    }
}

impl InputStore for MemoryStore {
    fn submit(&mut self, frame: Frame, player: PlayerId, input: PlayerInput) {
        log::trace!("store: input for frame {} from {}", frame, player);
        self.record.entry(frame).or_default().insert(player, input);
    }

    fn fetch(&self, frame: Frame) -> Option<InputSet> {
        self.record.get(&frame).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelock_core::Vec3;

    fn input(v: Vec3) -> PlayerInput {
        PlayerInput::new(v)
    }

    #[test]
    fn test_unavailable_frame_is_none() {
        let store = MemoryStore::new();
        assert!(store.fetch(1).is_none());
    }

    #[test]
    fn test_submit_and_fetch_full_set() {
        let mut store = MemoryStore::new();
        let a = PlayerId::new(1);
        let b = PlayerId::new(2);

        store.submit(3, a, input(Vec3::RIGHT));
        store.submit(3, b, input(Vec3::UP));

        let set = store.fetch(3).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[&a], input(Vec3::RIGHT));
        assert_eq!(set[&b], input(Vec3::UP));
    }

    #[test]
    fn test_resubmit_is_last_write_wins() {
        let mut store = MemoryStore::new();
        let a = PlayerId::new(1);

        store.submit(2, a, input(Vec3::RIGHT));
        store.submit(2, a, input(Vec3::UP));

        let set = store.fetch(2).unwrap();
        assert_eq!(set[&a], input(Vec3::UP));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_out_of_order_submission() {
        let mut store = MemoryStore::new();
        let a = PlayerId::new(1);

        store.submit(5, a, input(Vec3::UP));
        store.submit(1, a, input(Vec3::RIGHT));

        assert!(store.fetch(1).is_some());
        assert!(store.fetch(5).is_some());
        assert!(store.fetch(3).is_none());
    }

    #[test]
    fn test_fetch_returns_independent_copy() {
        let mut store = MemoryStore::new();
        let a = PlayerId::new(1);
        store.submit(1, a, input(Vec3::RIGHT));

        let mut fetched = store.fetch(1).unwrap();
        fetched.insert(PlayerId::new(2), input(Vec3::UP));

        // The store's record is unchanged by mutating the copy.
        assert_eq!(store.fetch(1).unwrap().len(), 1);
    }
}
