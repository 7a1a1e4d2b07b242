//! The local simulation session
//!
//! A [`Session`] owns the current snapshot, the per-frame state and input
//! histories, and a handle to the authoritative input store. One call to
//! [`Session::tick`] per fixed-rate driver tick does everything: poll the
//! store for the confirmation that is due, resimulate from it if it arrived,
//! then advance one predicted frame.
//!
//! The frame counter is the whole state machine. Frame 0 is the seeded
//! initial snapshot; every tick advances exactly one frame; rollback never
//! moves the counter, it only rewrites history between the confirmed frame
//! and the present.

use crate::{Error, InputLog, InputSource, MapHistory, Result};
use framelock_core::{
    step, Frame, FrameSnapshot, GameState, InputSet, PlayerId, PlayerInput, StateHistory,
    TickDuration,
};
use framelock_store::InputStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How unconfirmed frames treat remote players during prediction and replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemotePrediction {
    /// Only the local player's input is applied to unconfirmed frames.
    ///
    /// Remote players freeze between confirmations and jump forward when
    /// their inputs arrive.
    Omit,
    /// Remote players repeat their most recently confirmed input.
    ///
    /// The usual production choice: remote motion stays continuous and the
    /// correction on confirmation is smaller whenever inputs change rarely.
    #[default]
    LastInput,
}

/// Session parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The player this session predicts and submits input for
    pub local_player: PlayerId,
    /// Confirmation delay in frames: the tick at frame `f` polls the store
    /// for frame `f - delay`
    pub delay: u64,
    /// Fixed per-tick duration, supplied by the external driver
    pub tick: TickDuration,
    /// Remote-player policy for unconfirmed frames
    pub remote_prediction: RemotePrediction,
    /// Retain at most this many frames of state/input history.
    ///
    /// `None` keeps everything for the lifetime of the session, so memory
    /// grows without bound. When set, the window is
    /// clamped to at least `delay + 2` so the next rollback's baseline is
    /// always still retained.
    pub retention: Option<u64>,
}

impl SessionConfig {
    /// Create a config with the defaults: delay 5, 60 Hz, last-input
    /// remote prediction, unbounded retention
    pub fn new(local_player: PlayerId) -> Self {
        Self {
            local_player,
            delay: 5,
            tick: TickDuration::default(),
            remote_prediction: RemotePrediction::default(),
            retention: None,
        }
    }

    /// Set the confirmation delay in frames
    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    /// Set the fixed tick duration
    pub fn with_tick(mut self, tick: TickDuration) -> Self {
        self.tick = tick;
        self
    }

    /// Set the remote-player prediction policy
    pub fn with_remote_prediction(mut self, policy: RemotePrediction) -> Self {
        self.remote_prediction = policy;
        self
    }

    /// Set the history retention window in frames
    pub fn with_retention(mut self, frames: u64) -> Self {
        self.retention = Some(frames);
        self
    }

    /// Effective retention window, clamped to cover the rollback horizon
    fn retention_window(&self) -> Option<u64> {
        self.retention.map(|frames| frames.max(self.delay + 2))
    }
}

/// The Local Simulation & History Manager
///
/// Owns its histories and current snapshot exclusively; the only structure
/// shared with the outside is the input store, crossed via value copies.
/// Multiple independent sessions can coexist (each test builds its own).
///
/// Generic over the store, the input source, and the history backend; the
/// backend defaults to the unbounded [`MapHistory`].
pub struct Session<S: InputStore, I: InputSource, H: StateHistory = MapHistory> {
    config: SessionConfig,
    store: S,
    source: I,
    state_history: H,
    input_log: InputLog,
    current_frame: Frame,
    current_state: GameState,
    initial_state: GameState,
    /// Highest frame for which an authoritative set has been applied
    confirmed_frame: Option<Frame>,
    /// Most recently confirmed input per player, for `LastInput` prediction
    last_confirmed: BTreeMap<PlayerId, PlayerInput>,
    /// First fault, latched until reset
    fault: Option<Error>,
}

impl<S: InputStore, I: InputSource> Session<S, I, MapHistory> {
    /// Create a session with the default unbounded history backend
    ///
    /// `initial_state` becomes the immutable frame-0 snapshot.
    pub fn new(config: SessionConfig, initial_state: GameState, store: S, source: I) -> Self {
        Self::with_history(config, initial_state, MapHistory::new(), store, source)
    }
}

impl<S: InputStore, I: InputSource, H: StateHistory> Session<S, I, H> {
    /// Create a session with a custom history backend
    ///
    /// The backend is cleared and seeded with the frame-0 snapshot.
    pub fn with_history(
        config: SessionConfig,
        initial_state: GameState,
        mut history: H,
        store: S,
        source: I,
    ) -> Self {
        history.clear();
        history.record(0, &initial_state);
        Self {
            config,
            store,
            source,
            state_history: history,
            input_log: InputLog::new(),
            current_frame: 0,
            current_state: initial_state.clone(),
            initial_state,
            confirmed_frame: None,
            last_confirmed: BTreeMap::new(),
            fault: None,
        }
    }

    /// Run one simulation tick
    ///
    /// Polls the store for the confirmation that is due, resimulates if it
    /// arrived, then advances one predicted frame. A store with nothing to
    /// deliver is the normal case: prediction simply continues uncorrected.
    ///
    /// After the first error the session is faulted and every further call
    /// returns that error until [`reset`](Session::reset); proceeding on a
    /// broken history would silently diverge from every other client.
    pub fn tick(&mut self) -> Result<()> {
        self.check_fault()?;
        let result = self.tick_inner();
        self.latch(result)
    }

    fn tick_inner(&mut self) -> Result<()> {
        // Poll for the confirmation due this tick. Frames start at 1, so
        // nothing can be confirmed until we are `delay` frames in.
        if let Some(confirm_frame) = self.current_frame.checked_sub(self.config.delay) {
            if confirm_frame >= 1 {
                if let Some(auth) = self.store.fetch(confirm_frame) {
                    self.resimulate_inner(confirm_frame, &auth)?;
                }
            }
        }

        // Advance one predicted frame.
        self.current_frame += 1;
        let frame = self.current_frame;
        let local_input = self.source.sample(frame);
        self.store.submit(frame, self.config.local_player, local_input);
        self.input_log.record(frame, local_input);

        let inputs = self.predicted_set(local_input);
        let next = step(&self.current_state, &inputs, self.config.tick);
        self.state_history.record(frame, &next);
        self.current_state = next;
        log::trace!("frame {}: predicted", frame);

        if let Some(window) = self.config.retention_window() {
            if let Some(cutoff) = frame.checked_sub(window) {
                self.state_history.evict_before(cutoff);
                self.input_log.evict_before(cutoff);
            }
        }
        Ok(())
    }

    /// Rollback resimulation: replay from `confirm_frame` to the present
    ///
    /// Applies the authoritative set at `confirm_frame`, then the recorded
    /// local predictions (plus last-known remote inputs, per policy) for
    /// every later frame, overwriting the state history as it goes. History
    /// below `confirm_frame - 1` is never touched. Safe to call on
    /// consecutive ticks; calling twice with the same arguments and no
    /// intervening advance produces identical state and history.
    ///
    /// A confirmation for a frame this session has not predicted yet is
    /// ignored: there is nothing recorded to replay on top of it.
    pub fn resimulate(&mut self, confirm_frame: Frame, auth: &InputSet) -> Result<()> {
        self.check_fault()?;
        let result = self.resimulate_inner(confirm_frame, auth);
        self.latch(result)
    }

    fn resimulate_inner(&mut self, confirm_frame: Frame, auth: &InputSet) -> Result<()> {
        if confirm_frame < 1 || confirm_frame > self.current_frame {
            log::warn!(
                "ignoring confirmation for frame {} at local frame {}",
                confirm_frame,
                self.current_frame
            );
            return Ok(());
        }

        // The replay baseline. Its absence means history was truncated past
        // the rollback horizon, which is fatal: any substitute baseline
        // would desynchronize this client for good.
        let baseline_frame = confirm_frame - 1;
        let mut state = self
            .state_history
            .state_at(baseline_frame)
            .ok_or(Error::MissingState { frame: baseline_frame })?
            .clone();

        log::debug!(
            "rollback: replaying frames {}..={}",
            confirm_frame,
            self.current_frame
        );

        // The confirmed inputs supersede what we predicted: remember them
        // for remote prediction, and rewrite the local log at the confirmed
        // frame so later rollbacks replay the confirmed value.
        for (player, input) in auth {
            self.last_confirmed.insert(*player, *input);
        }
        if let Some(local) = auth.get(&self.config.local_player) {
            self.input_log.record(confirm_frame, *local);
        }

        // Full replay, not an incremental patch: every frame from the
        // divergence point forward was computed on a superseded baseline.
        for frame in confirm_frame..=self.current_frame {
            let inputs = if frame == confirm_frame {
                auth.clone()
            } else {
                let local = self
                    .input_log
                    .get(frame)
                    .ok_or(Error::MissingInput { frame })?;
                self.predicted_set(local)
            };
            state = step(&state, &inputs, self.config.tick);
            self.state_history.record(frame, &state);
        }

        self.current_state = state;
        self.confirmed_frame = Some(self.confirmed_frame.map_or(confirm_frame, |f| f.max(confirm_frame)));
        Ok(())
    }

    /// The input set used to advance an unconfirmed frame
    fn predicted_set(&self, local_input: PlayerInput) -> InputSet {
        let mut inputs = InputSet::new();
        if self.config.remote_prediction == RemotePrediction::LastInput {
            for (player, input) in &self.last_confirmed {
                if *player != self.config.local_player {
                    inputs.insert(*player, *input);
                }
            }
        }
        inputs.insert(self.config.local_player, local_input);
        inputs
    }

    fn check_fault(&self) -> Result<()> {
        match &self.fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    fn latch(&mut self, result: Result<()>) -> Result<()> {
        if let Err(fault) = &result {
            log::error!("session fault: {}", fault);
            self.fault = Some(fault.clone());
        }
        result
    }

    /// Tear the session back down to frame 0
    ///
    /// Reseeds the initial snapshot, clears both histories and any latched
    /// fault. The store is not touched; it belongs to the channel, not to
    /// this session.
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.current_state = self.initial_state.clone();
        self.state_history.clear();
        self.state_history.record(0, &self.initial_state);
        self.input_log.clear();
        self.confirmed_frame = None;
        self.last_confirmed.clear();
        self.fault = None;
    }

    /// Current local frame
    pub fn current_frame(&self) -> Frame {
        self.current_frame
    }

    /// Current snapshot
    pub fn state(&self) -> &GameState {
        &self.current_state
    }

    /// An owned copy of the current frame and snapshot, for external logging
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.current_frame,
            state: self.current_state.clone(),
        }
    }

    /// Highest confirmed frame, if any confirmation has been applied
    pub fn confirmed_frame(&self) -> Option<Frame> {
        self.confirmed_frame
    }

    /// The input recorded (predicted or confirmed) for a frame
    pub fn local_input(&self, frame: Frame) -> Option<PlayerInput> {
        self.input_log.get(frame)
    }

    /// The latched fault, if the session has failed
    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The state history backend
    pub fn history(&self) -> &H {
        &self.state_history
    }

    /// The authoritative store handle
    ///
    /// In-process deployments share the store through the session; tests use
    /// this to play the role of the remote side of the channel.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Alternating, NoInput};
    use framelock_core::{Vec3, MOVE_SPEED};
    use framelock_frame_buffer::FrameBuffer;
    use framelock_store::MemoryStore;

    const LOCAL: PlayerId = PlayerId(1);
    const REMOTE: PlayerId = PlayerId(2);

    fn config(delay: u64) -> SessionConfig {
        SessionConfig::new(LOCAL)
            .with_delay(delay)
            .with_tick(TickDuration::from_secs(0.1))
    }

    fn one_step(dt: TickDuration) -> Vec3 {
        Vec3::RIGHT.normalized() * (MOVE_SPEED * dt.as_secs())
    }

    // A channel that never delivers: prediction runs forever uncorrected.
    struct SilentStore;

    impl InputStore for SilentStore {
        fn submit(&mut self, _frame: Frame, _player: PlayerId, _input: PlayerInput) {}

        fn fetch(&self, _frame: Frame) -> Option<InputSet> {
            None
        }
    }

    #[test]
    fn test_prediction_matches_transition_function() {
        // Delay 2, input alternating between move and idle. After 4 ticks
        // with no divergence the position must equal the inputs for frames
        // 1..=4 folded through the transition function, confirmations and
        // all.
        let cfg = config(2);
        let initial = GameState::with_players([LOCAL]);
        let mut session = Session::new(
            cfg.clone(),
            initial.clone(),
            MemoryStore::new(),
            Alternating::default(),
        );

        for _ in 0..4 {
            session.tick().unwrap();
        }

        let mut expected = initial;
        let mut source = Alternating::default();
        for frame in 1..=4 {
            let inputs = InputSet::from([(LOCAL, source.sample(frame))]);
            expected = step(&expected, &inputs, cfg.tick);
        }

        assert_eq!(session.current_frame(), 4);
        assert_eq!(session.state(), &expected);
        // The poll runs before the advance, so tick 4 confirmed frame 1.
        assert_eq!(session.confirmed_frame(), Some(1));
    }

    #[test]
    fn test_unavailable_confirmation_is_not_an_error() {
        let mut session = Session::new(
            config(1),
            GameState::with_players([LOCAL]),
            SilentStore,
            NoInput,
        );

        for _ in 0..5 {
            session.tick().unwrap();
        }

        assert_eq!(session.current_frame(), 5);
        assert_eq!(session.confirmed_frame(), None);
        assert!(session.fault().is_none());
    }

    #[test]
    fn test_convergence_with_agreeing_inputs() {
        // Same source, one session confirmed every tick and one never
        // confirmed at all: with no actual disagreement the states must be
        // identical.
        let initial = GameState::with_players([LOCAL]);
        let mut confirmed = Session::new(
            config(2),
            initial.clone(),
            MemoryStore::new(),
            Alternating::default(),
        );
        let mut predicted = Session::new(config(2), initial, SilentStore, Alternating::default());

        for _ in 0..8 {
            confirmed.tick().unwrap();
            predicted.tick().unwrap();
        }

        assert!(confirmed.confirmed_frame().is_some());
        assert!(predicted.confirmed_frame().is_none());
        assert_eq!(confirmed.state(), predicted.state());
    }

    #[test]
    fn test_divergent_confirmation_rewrites_history() {
        // Predicted idle everywhere; the authoritative input for frame 3
        // turns out to be a move. Frames 3..=5 must be recomputed on top of
        // the confirmed input.
        let cfg = config(2);
        let mut session = Session::new(
            cfg.clone(),
            GameState::with_players([LOCAL]),
            MemoryStore::new(),
            NoInput,
        );
        for _ in 0..5 {
            session.tick().unwrap();
        }

        let auth = InputSet::from([(LOCAL, PlayerInput::new(Vec3::RIGHT))]);
        session.resimulate(3, &auth).unwrap();

        let moved = one_step(cfg.tick);
        for frame in 3..=5 {
            let state = session.history().state_at(frame).unwrap();
            assert_eq!(state.player(LOCAL).unwrap().position, moved, "frame {}", frame);
        }
        assert_eq!(session.state().player(LOCAL).unwrap().position, moved);
        // The stale prediction at the confirmed frame was replaced.
        assert_eq!(session.local_input(3), Some(PlayerInput::new(Vec3::RIGHT)));
        // Frames before the divergence point still show no movement.
        assert_eq!(
            session.history().state_at(2).unwrap().player(LOCAL).unwrap().position,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_resimulation_is_idempotent() {
        let cfg = config(2);
        let mut session = Session::new(
            cfg,
            GameState::with_players([LOCAL]),
            MemoryStore::new(),
            NoInput,
        );
        for _ in 0..5 {
            session.tick().unwrap();
        }

        let auth = InputSet::from([(LOCAL, PlayerInput::new(Vec3::RIGHT))]);
        session.resimulate(3, &auth).unwrap();
        let state_first = session.state().clone();
        let history_first: Vec<GameState> = (0..=5)
            .map(|f| session.history().state_at(f).unwrap().clone())
            .collect();

        session.resimulate(3, &auth).unwrap();
        let history_second: Vec<GameState> = (0..=5)
            .map(|f| session.history().state_at(f).unwrap().clone())
            .collect();

        assert_eq!(session.state(), &state_first);
        assert_eq!(history_first, history_second);
    }

    #[test]
    fn test_history_below_rollback_point_is_untouched() {
        let cfg = config(2);
        let mut session = Session::new(
            cfg,
            GameState::with_players([LOCAL]),
            MemoryStore::new(),
            Alternating::default(),
        );
        for _ in 0..6 {
            session.tick().unwrap();
        }

        // Bytes of everything below the rollback baseline, before and after.
        let before: Vec<Vec<u8>> = (0..=2)
            .map(|f| bincode::serialize(session.history().state_at(f).unwrap()).unwrap())
            .collect();

        let auth = InputSet::from([(LOCAL, PlayerInput::new(Vec3::UP))]);
        session.resimulate(4, &auth).unwrap();

        let after: Vec<Vec<u8>> = (0..=2)
            .map(|f| bincode::serialize(session.history().state_at(f).unwrap()).unwrap())
            .collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_history_is_a_latched_fault() {
        // A two-slot ring cannot hold the baseline for a rollback five
        // frames deep; the session must fault, stay faulted, and come back
        // clean after reset.
        let cfg = config(10);
        let initial = GameState::with_players([LOCAL]);
        let mut session = Session::with_history(
            cfg,
            initial.clone(),
            FrameBuffer::new(2),
            MemoryStore::new(),
            NoInput,
        );
        for _ in 0..5 {
            session.tick().unwrap();
        }

        let auth = InputSet::from([(LOCAL, PlayerInput::idle())]);
        let err = session.resimulate(4, &auth).unwrap_err();
        assert_eq!(err, Error::MissingState { frame: 3 });

        // Latched: the next tick reports the same fault.
        assert_eq!(session.tick().unwrap_err(), err);
        assert_eq!(session.fault(), Some(&err));

        session.reset();
        assert_eq!(session.current_frame(), 0);
        assert_eq!(session.state(), &initial);
        session.tick().unwrap();
    }

    #[test]
    fn test_remote_players_replay_last_confirmed_input() {
        let cfg = config(2);
        let initial = GameState::with_players([LOCAL, REMOTE]);
        let mut session = Session::new(cfg.clone(), initial, MemoryStore::new(), NoInput);

        // The remote player moved right on frame 1.
        session
            .store_mut()
            .submit(1, REMOTE, PlayerInput::new(Vec3::RIGHT));

        for _ in 0..4 {
            session.tick().unwrap();
        }

        // Tick 4 confirmed frame 1, which applied the remote move; frames
        // 2..3 were replayed and frame 4 predicted, each repeating it as
        // the last known remote input.
        let expected = one_step(cfg.tick) * 4.0;
        assert_eq!(session.state().player(REMOTE).unwrap().position, expected);
        assert_eq!(session.state().player(LOCAL).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_remote_players_omitted_under_omit_policy() {
        let cfg = config(2).with_remote_prediction(RemotePrediction::Omit);
        let initial = GameState::with_players([LOCAL, REMOTE]);
        let mut session = Session::new(cfg.clone(), initial, MemoryStore::new(), NoInput);

        session
            .store_mut()
            .submit(1, REMOTE, PlayerInput::new(Vec3::RIGHT));

        for _ in 0..4 {
            session.tick().unwrap();
        }

        // Only the confirmed frame moved the remote player.
        let expected = one_step(cfg.tick);
        assert_eq!(session.state().player(REMOTE).unwrap().position, expected);
    }

    #[test]
    fn test_retention_window_bounds_history() {
        let cfg = config(1).with_retention(3);
        let mut session = Session::new(
            cfg,
            GameState::with_players([LOCAL]),
            MemoryStore::new(),
            Alternating::default(),
        );

        for _ in 0..10 {
            session.tick().unwrap();
        }

        // Window of 3 frames behind frame 10: 6 and older are gone,
        // confirmations kept flowing the whole time.
        assert!(session.history().state_at(6).is_none());
        assert!(session.history().state_at(7).is_some());
        assert!(session.history().len() <= 4);
        assert_eq!(session.confirmed_frame(), Some(8));
    }

    #[test]
    fn test_confirmation_beyond_present_is_ignored() {
        let mut session = Session::new(
            config(2),
            GameState::with_players([LOCAL]),
            MemoryStore::new(),
            NoInput,
        );
        session.tick().unwrap();
        let before = session.state().clone();

        let auth = InputSet::from([(LOCAL, PlayerInput::new(Vec3::RIGHT))]);
        session.resimulate(9, &auth).unwrap();

        assert_eq!(session.state(), &before);
        assert_eq!(session.confirmed_frame(), None);
    }
}
