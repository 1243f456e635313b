//! Session and round state machine
//!
//! The session is the single owner of the simulation. Every operation
//! builds the next snapshot from a copy of the committed one and swaps it
//! in whole, so a renderer holding an `Arc<GameState>` only ever sees
//! fully resolved states.
//!
//! Phases: `Uninitialized -> Ready -> Started <-> GameOver`. Starting a
//! round and recovering from game over are the same transition.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::sim::collision::Impact;
use crate::sim::rng::{GapRng, PcgGapRng};
use crate::sim::state::{GamePhase, GameState, World};
use crate::sim::{obstacles, tick};

/// What a primary input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// No viewport yet
    Ignored,
    /// Jumped and survived
    Flapped,
    /// Jumped into something
    Crashed(Impact),
    /// A new round began with this id
    RoundStarted(Uuid),
}

pub struct Session<R: GapRng = PcgGapRng> {
    config: SimConfig,
    state: Arc<GameState>,
    /// Commit counter, bumped on every snapshot swap
    version: u64,
    /// Viewport change received mid-round, applied at the next round start
    pending_world: Option<World>,
    rng: R,
}

impl Session<PcgGapRng> {
    /// Session with a PCG source seeded from config, or from the clock if unset
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let seed = config.seed.unwrap_or_else(clock_seed);
        log::info!("Session seed {}", seed);
        Self::with_rng(config, PcgGapRng::new(seed))
    }
}

impl<R: GapRng> Session<R> {
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, SimError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self {
            config,
            state: Arc::new(state),
            version: 0,
            pending_world: None,
            rng,
        })
    }

    /// Last committed snapshot
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Committed snapshot as JSON for a renderer
    pub fn snapshot_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(&*self.state)?)
    }

    /// Physics and obstacle ticks should be running
    pub fn physics_active(&self) -> bool {
        self.state.is_started()
    }

    /// Flap animation should be running
    pub fn animation_active(&self) -> bool {
        self.state.agent.is_flying
    }

    /// Build the next snapshot from the current one and swap it in
    fn commit<T>(&mut self, step: impl FnOnce(&mut GameState, &SimConfig, &mut R) -> T) -> T {
        let mut next = GameState::clone(&self.state);
        let out = step(&mut next, &self.config, &mut self.rng);
        self.state = Arc::new(next);
        self.version += 1;
        out
    }

    /// Viewport size is known (or changed).
    ///
    /// Outside a round this centres the agent and lays out the gates. During
    /// a round the new size is held back until the next round starts.
    pub fn on_viewport_ready(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let world = World::new(width, height)?;

        if self.state.is_started() {
            log::warn!(
                "Viewport changed to {}x{} mid-round; applying at next round",
                width,
                height
            );
            self.pending_world = Some(world);
            return Ok(());
        }

        // a size queued during the last round is stale now
        self.pending_world = None;
        self.commit(|state, config, rng| {
            state.world = world;
            state.is_mobile = world.width <= config.mobile_max_width;
            if state.phase == GamePhase::Uninitialized {
                state.phase = GamePhase::Ready;
            }
            state.agent.center_in(&world);
            obstacles::layout(state, rng);
        });
        log::info!("Viewport ready {}x{} (mobile: {})", width, height, self.state.is_mobile);
        Ok(())
    }

    /// Click/tap/key: jump during a round, otherwise start a new one
    pub fn on_primary_input(&mut self) -> InputOutcome {
        self.on_primary_input_at(Utc::now())
    }

    /// As `on_primary_input`, with the round start time supplied by the caller
    pub fn on_primary_input_at(&mut self, now: DateTime<Utc>) -> InputOutcome {
        let phase = self.state.phase;
        match phase {
            GamePhase::Uninitialized => {
                log::warn!("Input ignored: viewport not ready");
                InputOutcome::Ignored
            }
            GamePhase::Started => match self.commit(|state, config, _| tick::fly_step(state, config)) {
                Some(impact) => InputOutcome::Crashed(impact),
                None => InputOutcome::Flapped,
            },
            GamePhase::Ready | GamePhase::GameOver => self.start_round(now),
        }
    }

    fn start_round(&mut self, now: DateTime<Utc>) -> InputOutcome {
        let pending = self.pending_world.take();
        let id = self.commit(|state, config, rng| {
            if let Some(world) = pending {
                state.world = world;
                state.is_mobile = world.width <= config.mobile_max_width;
            }
            let id = uuid::Builder::from_random_bytes(rng.token().to_le_bytes()).into_uuid();
            state.rounds.start_round(now, id);
            state.agent.respawn(&state.world);
            obstacles::layout(state, rng);
            state.time_ticks = 0;
            state.phase = GamePhase::Started;
            id
        });
        log::info!("Round {} started ({} total)", id, self.state.rounds.len());
        InputOutcome::RoundStarted(id)
    }

    /// Physics tick: fall + collision
    pub fn fall_tick(&mut self) -> Option<Impact> {
        if !self.physics_active() {
            return None;
        }
        self.commit(|state, config, _| tick::fall_step(state, config))
    }

    /// Obstacle tick: scroll + recycle
    pub fn scroll_tick(&mut self) -> usize {
        if !self.physics_active() {
            return 0;
        }
        self.commit(|state, config, rng| tick::scroll_step(state, config, rng))
    }

    /// Combined scroll + fall + collision at a single rate
    pub fn tick(&mut self) -> Option<Impact> {
        if !self.physics_active() {
            return None;
        }
        self.commit(|state, config, rng| tick::tick(state, config, rng))
    }

    /// Animation tick: next flap frame
    pub fn frame_tick(&mut self) -> bool {
        if !self.animation_active() {
            return false;
        }
        self.commit(|state, _, _| tick::frame_step(state))
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedGapRng;
    use chrono::TimeZone;
    use glam::Vec2;

    fn session() -> Session<PcgGapRng> {
        let config = SimConfig {
            seed: Some(2024),
            ..Default::default()
        };
        Session::new(config).unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_input_before_viewport_is_ignored() {
        let mut session = session();
        assert_eq!(session.on_primary_input(), InputOutcome::Ignored);
        assert!(session.state().rounds.is_empty());
        assert_eq!(session.state().phase, GamePhase::Uninitialized);
        assert_eq!(session.fall_tick(), None);
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_invalid_viewport_leaves_state_alone() {
        let mut session = session();
        let err = session.on_viewport_ready(0.0, 600.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidViewport { .. }));
        assert!(!session.state().is_ready());
    }

    #[test]
    fn test_viewport_ready_centres_and_lays_out() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.is_mobile);
        assert!(!state.is_started());
        assert_eq!(state.agent.position, Vec2::new(154.0, 268.0));
        assert_eq!(state.pairs[0].x(), 500.0);
        assert!(state.pairs.iter().all(|p| p.width() == 100.0));
    }

    #[test]
    fn test_desktop_viewport_is_not_mobile() {
        let mut session = session();
        session.on_viewport_ready(1280.0, 720.0).unwrap();
        assert!(!session.state().is_mobile);
    }

    #[test]
    fn test_end_to_end_round() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        assert!(matches!(session.on_primary_input(), InputOutcome::RoundStarted(_)));
        assert!(session.state().is_started());
        assert_eq!(session.state().agent.position, Vec2::new(154.0, 268.0));

        assert_eq!(session.fall_tick(), None);
        assert_eq!(session.state().agent.position.y, 273.0);
        assert!(session.state().agent.is_flying);

        assert_eq!(session.on_primary_input(), InputOutcome::Flapped);
        assert_eq!(session.state().agent.position.y, 198.0);

        // 537 + 64 = 601, short of the 620 ground line
        session.commit(|state, _, _| state.agent.position.y = 532.0);
        assert_eq!(session.fall_tick(), None);
        assert_eq!(session.state().agent.position.y, 537.0);

        // 557 + 64 = 621 >= 620
        session.commit(|state, _, _| state.agent.position.y = 552.0);
        assert_eq!(session.fall_tick(), Some(Impact::Ground));
        let state = session.state();
        assert_eq!(state.agent.position.y, 557.0);
        assert!(state.is_game_over());
        assert!(!state.is_started());
        assert!(!state.agent.is_flying);
    }

    #[test]
    fn test_game_over_is_terminal_until_input() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input_at(at(1_000));
        while session.fall_tick().is_none() {}
        let frozen = session.snapshot();

        assert_eq!(session.fall_tick(), None);
        assert_eq!(session.scroll_tick(), 0);
        assert_eq!(session.tick(), None);
        assert!(!session.frame_tick());
        assert!(session.state().is_game_over());
        assert_eq!(session.state().agent.position, frozen.agent.position);

        let first_id = session.state().rounds.latest().map(|r| r.id);
        let outcome = session.on_primary_input_at(at(2_000));
        let InputOutcome::RoundStarted(id) = outcome else {
            panic!("expected a new round, got {:?}", outcome);
        };
        assert_ne!(Some(id), first_id);
        let state = session.state();
        assert!(state.is_started());
        assert!(!state.is_game_over());
        assert!(state.agent.is_flying);
        assert_eq!(state.agent.position, state.agent.initial);
        assert_eq!(state.rounds.len(), 2);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_round_log_is_append_only() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input_at(at(1_000));
        let first = session.state().rounds.latest().cloned().unwrap();
        while session.fall_tick().is_none() {}
        session.on_primary_input_at(at(1_000));

        let records: Vec<_> = session.state().rounds.iter().cloned().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert!(records[1].timestamp > records[0].timestamp);
        assert_ne!(records[1].id, records[0].id);
        assert_eq!(records[1].score, 0);
    }

    #[test]
    fn test_flap_during_round_does_not_append_round() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input();
        session.on_primary_input();
        session.on_primary_input();
        assert_eq!(session.state().rounds.len(), 1);
        assert_eq!(session.state().agent.position.y, 268.0 - 150.0);
    }

    #[test]
    fn test_snapshot_is_not_mutated_by_later_ticks() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input();
        let held = session.snapshot();
        let version = session.version();

        session.fall_tick();
        session.scroll_tick();

        assert_eq!(held.agent.position.y, 268.0);
        assert_eq!(held.pairs[0].x(), 500.0);
        assert_eq!(session.state().pairs[0].x(), 495.0);
        assert_eq!(session.version(), version + 2);
    }

    #[test]
    fn test_mid_round_resize_applies_next_round() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input();
        session.on_viewport_ready(800.0, 1000.0).unwrap();
        assert_eq!(session.state().world.width, 400.0);

        while session.fall_tick().is_none() {}
        session.on_primary_input();
        let state = session.state();
        assert_eq!(state.world, World::new(800.0, 1000.0).unwrap());
        assert_eq!(state.geometry.pair_width, 200.0);
        assert_eq!(state.agent.position, Vec2::new(354.0, 468.0));
    }

    #[test]
    fn test_resize_after_game_over_replaces_queued_size() {
        let mut session = session();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input();
        session.on_viewport_ready(800.0, 1000.0).unwrap();
        while session.fall_tick().is_none() {}

        session.on_viewport_ready(1200.0, 900.0).unwrap();
        assert_eq!(session.state().world, World::new(1200.0, 900.0).unwrap());
        session.on_primary_input();
        let state = session.state();
        assert!(state.is_started());
        assert_eq!(state.world, World::new(1200.0, 900.0).unwrap());
        assert_eq!(state.geometry.pair_width, 300.0);
    }

    #[test]
    fn test_scripted_rng_gives_exact_gates() {
        let config = SimConfig::default();
        // viewport layout, then round layout: all high band at the top of the range
        let rng = ScriptedGapRng::new([true; 8], [1.0; 8]);
        let mut session = Session::with_rng(config, rng).unwrap();
        session.on_viewport_ready(400.0, 600.0).unwrap();
        session.on_primary_input();
        for pair in &session.state().pairs {
            assert_eq!(pair.extension, 100.0);
            assert_eq!(pair.top.size.y, 300.0);
            assert_eq!(pair.bottom.position.y, 500.0);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut session = session();
            session.on_viewport_ready(400.0, 600.0).unwrap();
            session.on_primary_input_at(at(0));
            for i in 0..200 {
                session.scroll_tick();
                if i % 7 == 0 {
                    session.on_primary_input_at(at(0));
                }
                session.fall_tick();
            }
            session.snapshot_json().unwrap()
        };
        assert_eq!(run(), run());
    }
}
