//! Simulation tunables
//!
//! Loaded from JSON when the runner is given a path, otherwise defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Agent size and movement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub width: f32,
    pub height: f32,
    /// Downward step per fall tick
    pub fall_distance: f32,
    pub fall_delay_ms: u64,
    /// Upward step per primary input
    pub fly_distance: f32,
    pub flap_delay_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            width: AGENT_WIDTH,
            height: AGENT_HEIGHT,
            fall_distance: FALL_DISTANCE,
            fall_delay_ms: FALL_DELAY_MS,
            fly_distance: FLY_DISTANCE,
            flap_delay_ms: FLAP_DELAY_MS,
        }
    }
}

/// Obstacle stream tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub pair_count: usize,
    /// Leftward step per scroll tick
    pub distance: f32,
    pub delay_ms: u64,
    /// Hitbox forgiveness margin
    pub tolerance: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            pair_count: PAIR_COUNT,
            distance: OBSTACLE_DISTANCE,
            delay_ms: OBSTACLE_DELAY_MS,
            tolerance: TOLERANCE,
        }
    }
}

/// All simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub agent: AgentConfig,
    pub obstacles: ObstacleConfig,
    /// Viewports at or below this width are flagged mobile
    pub mobile_max_width: f32,
    /// Seed for the gap/identity RNG (None = caller picks)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            obstacles: ObstacleConfig::default(),
            mobile_max_width: MOBILE_MAX_WIDTH,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject values that would produce degenerate geometry or stalled timers
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{} must be positive, got {}", name, v)))
            }
        };
        positive("agent.width", self.agent.width)?;
        positive("agent.height", self.agent.height)?;
        positive("agent.fall_distance", self.agent.fall_distance)?;
        positive("agent.fly_distance", self.agent.fly_distance)?;
        positive("obstacles.distance", self.obstacles.distance)?;
        positive("mobile_max_width", self.mobile_max_width)?;

        if self.obstacles.pair_count == 0 {
            return Err(SimError::InvalidConfig("obstacles.pair_count must be at least 1".into()));
        }
        if !(self.obstacles.tolerance.is_finite() && self.obstacles.tolerance >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "obstacles.tolerance must be non-negative, got {}",
                self.obstacles.tolerance
            )));
        }
        for (name, ms) in [
            ("agent.fall_delay_ms", self.agent.fall_delay_ms),
            ("agent.flap_delay_ms", self.agent.flap_delay_ms),
            ("obstacles.delay_ms", self.obstacles.delay_ms),
        ] {
            if ms == 0 {
                return Err(SimError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    pub fn fall_period(&self) -> Duration {
        Duration::from_millis(self.agent.fall_delay_ms)
    }

    pub fn flap_period(&self) -> Duration {
        Duration::from_millis(self.agent.flap_delay_ms)
    }

    pub fn scroll_period(&self) -> Duration {
        Duration::from_millis(self.obstacles.delay_ms)
    }
}
