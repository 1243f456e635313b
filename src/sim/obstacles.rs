//! Obstacle generator and recycler
//!
//! The gate set never grows or shrinks. `layout` places every pair
//! staggered beyond the right edge at round start; `advance` scrolls them
//! left and regenerates any pair that has fully left the screen, giving it
//! fresh keys so renderers treat it as a new entity.

use glam::Vec2;

use super::rng::GapRng;
use super::state::{GameState, GateGeometry, ObstaclePair, World};

/// Draw a gap extension in `[0, scale]`.
///
/// A coin picks the band (upper or lower half) before the uniform draw, so
/// gates lean clearly high or clearly low instead of bunching at the middle.
pub fn random_extension<R: GapRng + ?Sized>(rng: &mut R, scale: f32) -> f32 {
    let fraction = if rng.coin_flip() {
        rng.fraction(0.5, 1.0)
    } else {
        rng.fraction(0.0, 0.5)
    };
    fraction * scale
}

/// Give a pair its geometry at horizontal offset `x`
fn shape_pair(pair: &mut ObstaclePair, x: f32, world: &World, geometry: &GateGeometry, extension: f32) {
    let height = geometry.base_gap_height + extension;
    let size = Vec2::new(geometry.pair_width, height);

    pair.top.initial = Vec2::new(x, 0.0);
    pair.top.position = pair.top.initial;
    pair.top.size = size;

    pair.bottom.initial = Vec2::new(x, world.height - geometry.base_gap_height + extension);
    pair.bottom.position = pair.bottom.initial;
    pair.bottom.size = size;

    pair.extension = extension;
}

/// Lay out every pair for a new round.
///
/// Pair `i` starts at `(2i + 1) * pair_width + world.width`. No-op while the
/// world is still zero-sized.
pub fn layout<R: GapRng + ?Sized>(state: &mut GameState, rng: &mut R) {
    if state.world.is_empty() {
        log::warn!("Obstacle layout skipped: world size unknown");
        return;
    }

    let world = state.world;
    let geometry = GateGeometry::for_world(&world, state.pairs.len());
    state.geometry = geometry;

    for i in 0..state.pairs.len() {
        let extension = random_extension(rng, geometry.extension_scale);
        let x = (2 * i + 1) as f32 * geometry.pair_width + world.width;
        let top_key = state.next_obstacle_key();
        let bottom_key = state.next_obstacle_key();

        let pair = &mut state.pairs[i];
        pair.top.key = top_key;
        pair.bottom.key = bottom_key;
        shape_pair(pair, x, &world, &geometry, extension);
    }

    log::debug!(
        "Laid out {} gates (width {:.1}, base gap {:.1})",
        state.pairs.len(),
        geometry.pair_width,
        geometry.base_gap_height
    );
}

/// Scroll every pair left by `distance`, recycling pairs that have exited.
///
/// A recycled pair does not also scroll this tick; it lands exactly on
/// `geometry.respawn_x`. Returns the number of recycled pairs.
pub fn advance<R: GapRng + ?Sized>(state: &mut GameState, distance: f32, rng: &mut R) -> usize {
    let world = state.world;
    let geometry = state.geometry;
    let mut recycled = 0;

    for i in 0..state.pairs.len() {
        if state.pairs[i].has_exited() {
            let extension = random_extension(rng, geometry.extension_scale);
            let top_key = state.next_obstacle_key();
            let bottom_key = state.next_obstacle_key();

            let pair = &mut state.pairs[i];
            pair.top.key = top_key;
            pair.bottom.key = bottom_key;
            shape_pair(pair, geometry.respawn_x(&world), &world, &geometry, extension);
            recycled += 1;

            log::debug!("Recycled gate {} (extension {:.1})", i, extension);
        } else {
            let pair = &mut state.pairs[i];
            pair.top.position.x -= distance;
            pair.bottom.position.x -= distance;
        }
    }

    recycled
}
