//! Framelock Store - Authoritative input registry
//!
//! The single wire-equivalent boundary of the workspace. Clients push their
//! per-frame inputs in through [`InputStore::submit`] and poll confirmed
//! frames back out through [`InputStore::fetch`]; only value copies cross in
//! either direction.
//!
//! In a networked deployment the trait would be backed by a real transport.
//! [`MemoryStore`] is the in-process reference implementation used by tests
//! and local sessions: it releases a frame as soon as any input for it has
//! been recorded, with the confirmation delay enforced by the polling client
//! rather than by the store.

mod memory;

pub use memory::MemoryStore;

use framelock_core::{Frame, InputSet, PlayerId, PlayerInput};

/// The authoritative input channel.
///
/// Both operations are non-blocking and synchronous here but are shaped for
/// an asynchronous, out-of-order delivery channel: submissions may arrive in
/// any order and any number of times, and a frame that has not been released
/// yet is a normal outcome, not an error.
pub trait InputStore {
    /// Record a player's input for a frame.
    ///
    /// Last-write-wins per `(frame, player)` pair; a client resending the
    /// same frame overwrites rather than errors. No ordering across frames
    /// or players is assumed.
    fn submit(&mut self, frame: Frame, player: PlayerId, input: PlayerInput);

    /// Fetch the full recorded input set for a frame, if released.
    ///
    /// Returns an owned copy; the store's record and the caller never share
    /// mutable memory. `None` means "not yet available" and callers are
    /// expected to poll again on a later tick.
    fn fetch(&self, frame: Frame) -> Option<InputSet>;
}
