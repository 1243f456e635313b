//! Tick consumers
//!
//! Each function takes the working copy of the snapshot and leaves it in a
//! fully resolved state: a movement step always ends with collision
//! evaluation and the rotation hint, so no caller can observe an agent
//! that moved without being checked.

use super::collision::{Impact, apply_impact, check_impact};
use super::obstacles;
use super::rng::GapRng;
use super::state::GameState;
use crate::config::SimConfig;

/// Collision + rotation hint, run at the end of every movement step
fn resolve_step(state: &mut GameState, config: &SimConfig) -> Option<Impact> {
    let impact = check_impact(
        &state.agent,
        &state.world,
        &state.pairs,
        config.obstacles.tolerance,
    );
    if let Some(impact) = impact {
        apply_impact(state, impact);
    }
    state.agent.update_rotation();
    check_invariants(state, config);
    impact
}

/// Physics tick: one fall step. No-op unless a round is in progress.
pub fn fall_step(state: &mut GameState, config: &SimConfig) -> Option<Impact> {
    if !state.is_started() {
        return None;
    }
    state.time_ticks += 1;
    state.agent.fall(config.agent.fall_distance);
    resolve_step(state, config)
}

/// Primary input during a round: one upward jump
pub fn fly_step(state: &mut GameState, config: &SimConfig) -> Option<Impact> {
    if !state.is_started() {
        return None;
    }
    state.agent.impulse(config.agent.fly_distance);
    resolve_step(state, config)
}

/// Obstacle tick: scroll and recycle. Returns the number of recycled gates.
pub fn scroll_step<R: GapRng + ?Sized>(state: &mut GameState, config: &SimConfig, rng: &mut R) -> usize {
    if !state.is_started() {
        return 0;
    }
    let recycled = obstacles::advance(state, config.obstacles.distance, rng);
    check_invariants(state, config);
    recycled
}

/// Combined physics tick for callers running obstacles and fall at one rate:
/// scroll first so the collision check sees this tick's gate positions.
pub fn tick<R: GapRng + ?Sized>(state: &mut GameState, config: &SimConfig, rng: &mut R) -> Option<Impact> {
    scroll_step(state, config, rng);
    fall_step(state, config)
}

/// Animation tick: advance the flap cycle while airborne
pub fn frame_step(state: &mut GameState) -> bool {
    if !state.agent.is_flying {
        return false;
    }
    state.agent.advance_frame();
    true
}

/// Structural invariants; any failure here is a simulation bug
pub fn check_invariants(state: &GameState, config: &SimConfig) {
    if !cfg!(debug_assertions) {
        return;
    }

    debug_assert_eq!(state.pairs.len(), config.obstacles.pair_count, "gate count changed");
    for (i, pair) in state.pairs.iter().enumerate() {
        debug_assert_eq!(
            pair.top.position.x, pair.bottom.position.x,
            "gate {} top/bottom x diverged",
            i
        );
        debug_assert_eq!(pair.top.size, pair.bottom.size, "gate {} halves differ in size", i);
        debug_assert!(
            pair.extension >= 0.0 && pair.extension <= state.geometry.extension_scale,
            "gate {} extension {} out of range",
            i,
            pair.extension
        );
    }

    debug_assert!(
        !(state.is_started() && !state.agent.is_flying),
        "grounded agent in a running round"
    );
    // Only the ground side: there is no ceiling collision, so an agent may
    // legitimately sit above y = 0.
    if state.is_started() {
        debug_assert!(
            state.agent.bottom() < state.world.height + config.obstacles.tolerance,
            "agent below ground without game over"
        );
    }
}
