//! State history trait for storing per-frame snapshots
//!
//! This trait is implemented by:
//! - `framelock-client`'s `MapHistory` (unbounded, the reference behavior)
//! - `framelock-frame-buffer`'s `FrameBuffer` (bounded ring buffer)
//!
//! Rollback rewrites history in place: `record` for an existing frame
//! replaces that entry and must never disturb entries at other frames.

use crate::{Frame, GameState};

/// Trait for storing and retrieving per-frame snapshots.
///
/// Implementations decide the retention strategy; the session decides what
/// is a fault. A backend that evicted a frame the session still needs simply
/// returns `None` from [`state_at`](StateHistory::state_at) and the session
/// surfaces the missing-history fault.
pub trait StateHistory {
    /// Store a snapshot for the given frame, overwriting any existing entry.
    ///
    /// The implementation stores its own copy; the caller's snapshot is
    /// never aliased.
    fn record(&mut self, frame: Frame, state: &GameState);

    /// Get the snapshot at exactly the given frame, if retained.
    fn state_at(&self, frame: Frame) -> Option<&GameState>;

    /// Drop all entries strictly before the given frame.
    ///
    /// Used to bound memory once frames fall outside the maximum possible
    /// rollback horizon.
    fn evict_before(&mut self, frame: Frame);

    /// Drop every entry.
    fn clear(&mut self);

    /// Maximum number of retained frames, or `None` if unbounded.
    fn capacity(&self) -> Option<usize>;

    /// Number of frames currently retained.
    fn len(&self) -> usize;

    /// Whether no frames are retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Oldest and newest retained frame, or `None` when empty.
    fn frame_range(&self) -> Option<(Frame, Frame)>;
}
