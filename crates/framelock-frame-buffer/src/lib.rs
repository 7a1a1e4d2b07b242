//! Framelock Frame Buffer - Bounded snapshot history
//!
//! A fixed-size ring buffer implementing [`StateHistory`], for sessions that
//! must not grow without bound. Size it to the maximum plausible rollback
//! window (confirmation delay plus a safety margin); frames older than the
//! window are evicted automatically as new frames are recorded.
//!
//! Eviction is honest: if the session later asks for a frame the ring has
//! already dropped, the lookup returns `None` and the session raises its
//! missing-history fault instead of resimulating from a wrong baseline.
//!
//! # Example
//!
//! ```rust
//! use framelock_core::{GameState, StateHistory};
//! use framelock_frame_buffer::FrameBuffer;
//!
//! // Delay of 5 frames plus margin.
//! let mut buffer = FrameBuffer::new(16);
//!
//! let state = GameState::new();
//! buffer.record(0, &state);
//! buffer.record(1, &state);
//!
//! assert!(buffer.state_at(1).is_some());
//! assert_eq!(buffer.frame_range(), Some((0, 1)));
//! ```

use framelock_core::{Frame, GameState, StateHistory};

/// A ring buffer of per-frame snapshots
///
/// Frames map to slots by `frame % capacity`, so recording frame `f + capacity`
/// reuses (and thereby evicts) the slot of frame `f`. Re-recording the same
/// frame during rollback lands in the same slot and overwrites in place,
/// which is exactly the history contract rollback needs.
#[derive(Debug)]
pub struct FrameBuffer {
    /// Slot storage: `None` means the slot has never been written
    slots: Vec<Option<(Frame, GameState)>>,
    /// Number of occupied slots
    count: usize,
    /// Maximum retained frames
    capacity: usize,
}

impl FrameBuffer {
    /// Create a buffer retaining at most `capacity` frames
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            count: 0,
            capacity,
        }
    }

    fn slot_index(&self, frame: Frame) -> usize {
        (frame as usize) % self.capacity
    }

    /// Iterate retained `(frame, snapshot)` pairs, oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = (Frame, &GameState)> {
        let mut entries: Vec<_> = self
            .slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(f, state)| (*f, state)))
            .collect();
        entries.sort_by_key(|(f, _)| *f);
        entries.into_iter()
    }

    /// Occupancy statistics
    pub fn stats(&self) -> BufferStats {
        let (oldest, newest) = self.frame_range().unwrap_or((0, 0));
        BufferStats {
            capacity: self.capacity,
            count: self.count,
            oldest_frame: oldest,
            newest_frame: newest,
        }
    }
}

impl StateHistory for FrameBuffer {
    fn record(&mut self, frame: Frame, state: &GameState) {
        let index = self.slot_index(frame);
        if self.slots[index].is_none() {
            self.count += 1;
        }
        self.slots[index] = Some((frame, state.clone()));
    }

    fn state_at(&self, frame: Frame) -> Option<&GameState> {
        let index = self.slot_index(frame);
        self.slots[index]
            .as_ref()
            .filter(|(f, _)| *f == frame)
            .map(|(_, state)| state)
    }

    fn evict_before(&mut self, frame: Frame) {
        for slot in &mut self.slots {
            if let Some((f, _)) = slot {
                if *f < frame {
                    *slot = None;
                    self.count -= 1;
                }
            }
        }
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.count = 0;
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn len(&self) -> usize {
        self.count
    }

    fn frame_range(&self) -> Option<(Frame, Frame)> {
        let mut range: Option<(Frame, Frame)> = None;
        for (f, _) in self.slots.iter().flatten() {
            range = Some(match range {
                Some((oldest, newest)) => (oldest.min(*f), newest.max(*f)),
                None => (*f, *f),
            });
        }
        range
    }
}

/// Occupancy statistics for a [`FrameBuffer`]
#[derive(Debug, Clone, Copy)]
pub struct BufferStats {
    /// Maximum retained frames
    pub capacity: usize,
    /// Currently occupied slots
    pub count: usize,
    /// Oldest retained frame (0 when empty)
    pub oldest_frame: Frame,
    /// Newest retained frame (0 when empty)
    pub newest_frame: Frame,
}

impl BufferStats {
    /// Fraction of slots occupied, 0.0 to 1.0
    pub fn fill_ratio(&self) -> f32 {
        self.count as f32 / self.capacity as f32
    }
}
