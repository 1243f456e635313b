//! Collision detection
//!
//! Pure checks of the agent against the ground and the gates. The
//! tolerance shrinks the agent's effective hitbox on every side so that
//! near-misses are forgiven.

use super::state::{Agent, GamePhase, GameState, ObstaclePair, World};

/// What the agent hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Ground,
    /// Index of the gate that was hit
    Pipe { pair: usize },
}

/// Agent bottom has reached the ground line (world bottom pushed down by tolerance)
pub fn ground_impact(agent: &Agent, world: &World, tolerance: f32) -> bool {
    agent.bottom() >= world.height + tolerance
}

/// Gate overlaps the agent's tolerance-shrunk horizontal extent
pub fn overlaps_horizontally(agent: &Agent, pair: &ObstaclePair, tolerance: f32) -> bool {
    pair.x() < agent.right() - tolerance && pair.x() + pair.width() > agent.left() + tolerance
}

/// Agent's shrunk vertical extent pokes out of the gap
fn outside_gap(agent: &Agent, pair: &ObstaclePair, tolerance: f32) -> bool {
    let agent_top = agent.top() + tolerance;
    let agent_bottom = agent.bottom() - tolerance;
    agent_top < pair.gap_top() || agent_bottom > pair.gap_bottom()
}

/// First gate the agent collides with, if any
pub fn pipe_impact(agent: &Agent, pairs: &[ObstaclePair], tolerance: f32) -> Option<usize> {
    pairs
        .iter()
        .position(|pair| overlaps_horizontally(agent, pair, tolerance) && outside_gap(agent, pair, tolerance))
}

/// Ground is checked before the gates
pub fn check_impact(
    agent: &Agent,
    world: &World,
    pairs: &[ObstaclePair],
    tolerance: f32,
) -> Option<Impact> {
    if ground_impact(agent, world, tolerance) {
        return Some(Impact::Ground);
    }
    pipe_impact(agent, pairs, tolerance).map(|pair| Impact::Pipe { pair })
}

/// End the round. Terminal until the next primary input.
pub fn apply_impact(state: &mut GameState, impact: Impact) {
    state.agent.is_flying = false;
    state.phase = GamePhase::GameOver;
    log::info!(
        "Impact {:?} at y={:.1} after {} ticks",
        impact,
        state.agent.position.y,
        state.time_ticks
    );
}
