//! Agent physics
//!
//! Movement is discrete: a fall tick moves the agent down a fixed step, an
//! input moves it up a fixed step. There is no velocity integration.

use glam::Vec2;

use super::state::{Agent, Rotation, World};
use crate::consts::FLAP_FRAMES;

impl Agent {
    /// Place the agent at the centre of the world and remember it as the spawn point
    pub fn center_in(&mut self, world: &World) {
        self.position = world.size() / 2.0 - self.size / 2.0;
        self.initial = self.position;
    }

    /// Reset for a new round
    pub fn respawn(&mut self, world: &World) {
        self.center_in(world);
        self.is_flying = true;
        self.update_rotation();
    }

    /// Single upward jump of `distance`
    pub fn impulse(&mut self, distance: f32) {
        self.is_flying = true;
        self.position.y -= distance;
    }

    /// One fall step of `distance`. Falling still counts as flying.
    pub fn fall(&mut self, distance: f32) {
        self.is_flying = true;
        self.position.y += distance;
    }

    /// Advance the flap animation one frame
    pub fn advance_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FLAP_FRAMES;
    }

    pub fn update_rotation(&mut self) {
        self.rotation = Rotation::for_flying(self.is_flying);
    }

    /// Centre point (used by the autopilot)
    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }
}
