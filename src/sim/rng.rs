//! Injectable random source
//!
//! Gap placement and round identities draw from a `GapRng` passed in by
//! the owner of the session. Production code seeds a PCG stream; tests
//! script the exact values they want.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Random draws the simulation needs
pub trait GapRng {
    /// Fair coin
    fn coin_flip(&mut self) -> bool;
    /// Uniform value in `[lo, hi]`
    fn fraction(&mut self, lo: f32, hi: f32) -> f32;
    /// 128 random bits for identities
    fn token(&mut self) -> u128;
}

/// Seeded PCG source (deterministic per seed)
#[derive(Debug, Clone)]
pub struct PcgGapRng {
    seed: u64,
    rng: Pcg32,
}

impl PcgGapRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl GapRng for PcgGapRng {
    fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn fraction(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn token(&mut self) -> u128 {
        self.rng.random()
    }
}

/// Replays fixed sequences; used to make layouts exact in tests.
///
/// Fractions are given as a position in `[0, 1]` within the requested
/// band. When a queue runs dry it falls back to `false` / the band floor,
/// and tokens count up from 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGapRng {
    flips: VecDeque<bool>,
    fractions: VecDeque<f32>,
    next_token: u128,
}

impl ScriptedGapRng {
    pub fn new(flips: impl IntoIterator<Item = bool>, fractions: impl IntoIterator<Item = f32>) -> Self {
        Self {
            flips: flips.into_iter().collect(),
            fractions: fractions.into_iter().collect(),
            next_token: 1,
        }
    }
}

impl GapRng for ScriptedGapRng {
    fn coin_flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }

    fn fraction(&mut self, lo: f32, hi: f32) -> f32 {
        let t = self.fractions.pop_front().unwrap_or(0.0).clamp(0.0, 1.0);
        lo + (hi - lo) * t
    }

    fn token(&mut self) -> u128 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }
}
