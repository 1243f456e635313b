//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete steps only, no wall clock
//! - Injected RNG only
//! - Stable iteration order (gates keep their slot for the whole process)
//! - No rendering or platform dependencies

pub mod agent;
pub mod collision;
pub mod obstacles;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Impact, check_impact, ground_impact, pipe_impact};
pub use rng::{GapRng, PcgGapRng, ScriptedGapRng};
pub use state::{
    Agent, GamePhase, GameState, GateGeometry, Obstacle, ObstacleKey, ObstaclePair, Rotation, World,
};
pub use tick::{fall_step, fly_step, frame_step, scroll_step, tick};
