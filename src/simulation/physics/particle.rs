//! Point masses integrated by the world.

use serde::{Deserialize, Serialize};

use super::super::vector::Vec2;

/// A point mass with an impulse accumulator.
///
/// A particle with zero inverse mass is pinned: integration and constraint
/// corrections leave it where it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Position in world units.
    pub pos: Vec2,
    /// Velocity in world units per second.
    pub vel: Vec2,
    /// Impulse accumulated since the last step, consumed by the next integration.
    pub impulse: Vec2,
    /// Mass.
    pub mass: f32,
    /// Cached `1 / mass`, zero for pinned particles.
    pub inv_mass: f32,
    /// Collision and rendering radius.
    pub radius: f32,
}

impl Particle {
    /// Creates a free particle at rest. Non-positive or non-finite mass pins it.
    pub fn new(pos: Vec2, mass: f32, radius: f32) -> Self {
        let inv_mass = if mass > 0.0 && mass.is_finite() {
            1.0 / mass
        } else {
            0.0
        };
        Self {
            pos,
            vel: Vec2::ZERO,
            impulse: Vec2::ZERO,
            mass,
            inv_mass,
            radius,
        }
    }

    /// Creates a static point that never moves.
    pub fn pinned(pos: Vec2) -> Self {
        Self::new(pos, f32::INFINITY, 0.0)
    }

    /// Returns `true` if this particle never moves.
    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Applies accumulated impulse and gravity to the velocity, then advances the position.
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if self.is_pinned() {
            self.vel = Vec2::ZERO;
            return;
        }
        self.vel += self.impulse * self.inv_mass + gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Changes the velocity by `impulse / mass` immediately.
    #[inline]
    pub fn apply_velocity_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse * self.inv_mass;
    }
}
