//! Demo autopilot
//!
//! Stands in for a player in the headless runner: aims the agent's centre
//! at the middle of the nearest gate that has not yet passed.

use crate::config::SimConfig;
use crate::sim::state::GameState;

/// Vertical centre of the gap the agent should aim for
pub fn target_height(state: &GameState) -> f32 {
    let agent_left = state.agent.left();
    state
        .pairs
        .iter()
        .filter(|p| p.width() > 0.0 && p.x() + p.width() > agent_left)
        .min_by(|a, b| a.x().total_cmp(&b.x()))
        .map(|p| (p.gap_top() + p.gap_bottom()) / 2.0)
        .unwrap_or(state.world.height / 2.0)
}

/// Flap once the agent has sunk half a jump below the target
pub fn should_flap(state: &GameState, config: &SimConfig) -> bool {
    if !state.is_started() {
        return false;
    }
    state.agent.center().y > target_height(state) + config.agent.fly_distance / 2.0
}
