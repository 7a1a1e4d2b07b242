//! Error types for framelock-client
//!
//! Only internal-invariant violations are errors. An authoritative input set
//! that has not arrived yet is an `Option::None` at the store boundary and
//! never surfaces here.

use framelock_core::Frame;
use thiserror::Error;

/// Session error type
///
/// `Clone` because a session latches its first fault and returns it from
/// every subsequent call until reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rollback needed a baseline snapshot that history no longer holds.
    ///
    /// History was evicted past the rollback horizon or was never seeded.
    /// Continuing from any substitute baseline would guarantee divergence,
    /// so the session refuses to proceed.
    #[error("Missing history snapshot for frame {frame}")]
    MissingState { frame: Frame },

    /// Replay needed a local input record that the log no longer holds.
    #[error("Missing local input record for frame {frame}")]
    MissingInput { frame: Frame },
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;
