//! Game state and core simulation types
//!
//! `GameState` is the snapshot handed to renderers. It is plain data:
//! every field is `Clone` and `Serialize`, and nothing in here touches
//! clocks or randomness directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::consts::FLAP_FRAMES;
use crate::error::SimError;
use crate::rounds::RoundLog;

/// Playable area supplied by the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    /// Validated world size; zero, negative and non-finite sizes are rejected
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(SimError::InvalidViewport { width, height })
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True until a real viewport has been supplied
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No viewport yet
    #[default]
    Uninitialized,
    /// Viewport known, waiting for the first input
    Ready,
    /// Round in progress
    Started,
    /// Round ended by an impact
    GameOver,
}

/// Presentational rotation hint for the agent sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Neutral,
    /// Full downward spin after impact
    Spin,
}

impl Rotation {
    pub fn for_flying(is_flying: bool) -> Self {
        if is_flying { Rotation::Neutral } else { Rotation::Spin }
    }

    /// Keyframes in degrees (from, to)
    pub fn degrees(&self) -> (f32, f32) {
        match self {
            Rotation::Neutral => (0.0, 0.0),
            Rotation::Spin => (0.0, 540.0),
        }
    }
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Top-left corner
    pub position: Vec2,
    /// Spawn point of the current round
    pub initial: Vec2,
    pub size: Vec2,
    /// Airborne; false only after an impact
    pub is_flying: bool,
    /// Index into the flap cycle, always < FLAP_FRAMES
    pub frame_index: usize,
    pub rotation: Rotation,
}

/// Sprite column for each flap frame, in multiples of the agent width
const FRAME_COLUMNS: [f32; FLAP_FRAMES] = [0.0, 1.0, 2.0, 0.0];

impl Agent {
    pub fn new(size: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            initial: Vec2::ZERO,
            size,
            is_flying: true,
            frame_index: 0,
            rotation: Rotation::Neutral,
        }
    }

    /// Horizontal sprite-sheet offset of the current flap frame
    pub fn frame_offset(&self) -> f32 {
        FRAME_COLUMNS[self.frame_index % FLAP_FRAMES] * self.size.x
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }
}

/// Opaque render identity of an obstacle. A new key means a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleKey(pub u64);

/// One half of a gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub key: ObstacleKey,
    /// Spawn point from the last layout or recycle
    pub initial: Vec2,
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Zero-sized placeholder used before the first layout
    pub fn placeholder(key: ObstacleKey) -> Self {
        Self {
            key,
            initial: Vec2::ZERO,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
        }
    }
}

/// A gate: top and bottom obstacles sharing x and height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub top: Obstacle,
    pub bottom: Obstacle,
    /// Random height extension drawn at the last (re)generation
    pub extension: f32,
}

impl ObstaclePair {
    #[inline]
    pub fn x(&self) -> f32 {
        self.top.position.x
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.top.size.x
    }

    /// Lower edge of the top obstacle
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.top.position.y + self.top.size.y
    }

    /// Upper edge of the bottom obstacle
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.bottom.position.y
    }

    pub fn gap_height(&self) -> f32 {
        self.gap_bottom() - self.gap_top()
    }

    /// Scrolled fully past the left edge
    pub fn has_exited(&self) -> bool {
        self.top.position.x + 2.0 * self.top.size.x <= 0.0
    }
}

/// Gate dimensions derived from the world size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GateGeometry {
    pub pair_width: f32,
    pub base_gap_height: f32,
    /// Upper bound of the random extension
    pub extension_scale: f32,
}

impl GateGeometry {
    pub fn for_world(world: &World, pair_count: usize) -> Self {
        Self {
            pair_width: world.width / pair_count as f32,
            base_gap_height: world.height / 3.0,
            extension_scale: world.height / 6.0,
        }
    }

    /// Where a recycled pair re-enters
    pub fn respawn_x(&self, world: &World) -> f32 {
        2.0 * self.pair_width + world.width
    }
}

/// Complete simulation snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub world: World,
    pub phase: GamePhase,
    /// Derived from viewport width, informational only
    pub is_mobile: bool,
    pub agent: Agent,
    pub geometry: GateGeometry,
    /// Fixed-length rolling set of gates
    pub pairs: Vec<ObstaclePair>,
    pub rounds: RoundLog,
    /// Physics steps applied in the current round
    pub time_ticks: u64,
    /// Next obstacle key
    next_key: u64,
}

impl GameState {
    pub fn new(config: &SimConfig) -> Self {
        let mut state = Self {
            world: World::default(),
            phase: GamePhase::Uninitialized,
            is_mobile: false,
            agent: Agent::new(Vec2::new(config.agent.width, config.agent.height)),
            geometry: GateGeometry::default(),
            pairs: Vec::with_capacity(config.obstacles.pair_count),
            rounds: RoundLog::new(),
            time_ticks: 0,
            next_key: 1,
        };

        for _ in 0..config.obstacles.pair_count {
            let top = Obstacle::placeholder(state.next_obstacle_key());
            let bottom = Obstacle::placeholder(state.next_obstacle_key());
            state.pairs.push(ObstaclePair {
                top,
                bottom,
                extension: 0.0,
            });
        }

        state
    }

    /// Allocate a never-before-used obstacle key
    pub fn next_obstacle_key(&mut self) -> ObstacleKey {
        let key = ObstacleKey(self.next_key);
        self.next_key += 1;
        key
    }

    pub fn is_ready(&self) -> bool {
        self.phase != GamePhase::Uninitialized
    }

    pub fn is_started(&self) -> bool {
        self.phase == GamePhase::Started
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_rejects_degenerate_sizes() {
        assert!(World::new(400.0, 600.0).is_ok());
        assert!(World::new(0.0, 600.0).is_err());
        assert!(World::new(400.0, -1.0).is_err());
        assert!(World::new(f32::NAN, 600.0).is_err());
        assert!(World::new(400.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_new_state_has_placeholder_pairs() {
        let state = GameState::new(&SimConfig::default());
        assert_eq!(state.phase, GamePhase::Uninitialized);
        assert!(!state.is_ready());
        assert_eq!(state.pairs.len(), 4);
        for pair in &state.pairs {
            assert_eq!(pair.top.size, Vec2::ZERO);
            assert_eq!(pair.bottom.size, Vec2::ZERO);
            assert_ne!(pair.top.key, pair.bottom.key);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut state = GameState::new(&SimConfig::default());
        let mut keys: Vec<_> = state
            .pairs
            .iter()
            .flat_map(|p| [p.top.key, p.bottom.key])
            .collect();
        keys.push(state.next_obstacle_key());
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn test_frame_offsets_cycle_back_to_start() {
        let mut agent = Agent::new(Vec2::new(92.0, 64.0));
        let offsets: Vec<f32> = (0..FLAP_FRAMES)
            .map(|i| {
                agent.frame_index = i;
                agent.frame_offset()
            })
            .collect();
        assert_eq!(offsets, vec![0.0, 92.0, 184.0, 0.0]);
    }

    #[test]
    fn test_phase_flags() {
        let mut state = GameState::new(&SimConfig::default());
        state.phase = GamePhase::GameOver;
        assert!(state.is_ready());
        assert!(state.is_game_over());
        assert!(!state.is_started());
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::for_flying(true).degrees(), (0.0, 0.0));
        assert_eq!(Rotation::for_flying(false).degrees(), (0.0, 540.0));
    }
}
