//! Flappy Sim - simulation core for a side-scrolling avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (agent physics, obstacles, collisions)
//! - `session`: Round state machine owning the committed snapshot
//! - `clock`: Virtual-time schedules for the physics and animation ticks
//! - `driver`: Dispatches schedule fires into the session
//! - `config`: Data-driven tunables

pub mod autopilot;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod rounds;
pub mod session;
pub mod sim;

pub use config::SimConfig;
pub use driver::Driver;
pub use error::SimError;
pub use rounds::{RoundLog, RoundRecord};
pub use session::{InputOutcome, Session};

/// Game configuration constants
pub mod consts {
    /// Agent sprite dimensions
    pub const AGENT_WIDTH: f32 = 92.0;
    pub const AGENT_HEIGHT: f32 = 64.0;

    /// Fall step per physics tick (pixels) and the tick period (ms)
    pub const FALL_DISTANCE: f32 = 5.0;
    pub const FALL_DELAY_MS: u64 = 30;

    /// Upward jump per primary input (pixels)
    pub const FLY_DISTANCE: f32 = 75.0;

    /// Flap animation period (ms)
    pub const FLAP_DELAY_MS: u64 = 100;

    /// Number of obstacle pairs in the rolling set
    pub const PAIR_COUNT: usize = 4;
    /// Leftward scroll per obstacle tick (pixels)
    pub const OBSTACLE_DISTANCE: f32 = 5.0;
    pub const OBSTACLE_DELAY_MS: u64 = 50;

    /// Hitbox forgiveness margin (pixels)
    pub const TOLERANCE: f32 = 20.0;

    /// Viewports at or below this width count as mobile
    pub const MOBILE_MAX_WIDTH: f32 = 640.0;

    /// Number of frames in the flap cycle
    pub const FLAP_FRAMES: usize = 4;

    /// Safety cap on schedule fires handled per `Driver::advance` call
    pub const MAX_SUBSTEPS: u32 = 64;
}
