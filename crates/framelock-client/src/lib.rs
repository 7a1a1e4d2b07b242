//! Framelock Client - Prediction and rollback resimulation
//!
//! The Local Simulation & History Manager of the workspace. A [`Session`]
//! is driven by an external fixed-rate tick and, each tick:
//!
//! 1. Polls the authoritative store for the frame that is due
//!    (`current_frame - delay`); if the confirmed input set has arrived,
//!    replays from that frame to the present, overwriting history.
//! 2. Advances one frame: samples local input, submits it to the store,
//!    predicts the next snapshot, and records both into history.
//!
//! ```text
//! tick ──▶ poll fetch(current - delay) ──▶ rollback resimulation (if due)
//!                                                │
//!      ◀── record history ◀── predict next ◀── advance frame
//! ```
//!
//! # Example
//!
//! ```rust
//! use framelock_client::{Alternating, Session, SessionConfig};
//! use framelock_core::{GameState, PlayerId, TickDuration};
//! use framelock_store::MemoryStore;
//!
//! let local = PlayerId::new(1);
//! let config = SessionConfig::new(local)
//!     .with_delay(2)
//!     .with_tick(TickDuration::from_hz(60.0));
//!
//! let mut session = Session::new(
//!     config,
//!     GameState::with_players([local]),
//!     MemoryStore::new(),
//!     Alternating::default(),
//! );
//!
//! for _ in 0..10 {
//!     session.tick().unwrap();
//! }
//! assert_eq!(session.current_frame(), 10);
//! ```

mod error;
mod history_map;
mod input_log;
mod input_source;
mod session;

pub use error::{Error, Result};
pub use history_map::MapHistory;
pub use input_log::InputLog;
pub use input_source::{Alternating, InputSource, NoInput};
pub use session::{RemotePrediction, Session, SessionConfig};

// Re-export the trait seams a session is built against
pub use framelock_core::StateHistory;
pub use framelock_store::InputStore;
