//! Soft linear and angular spring constraints.
//!
//! Both constraints work on velocities. Each solver pass computes the impulse that
//! would close `stiffness` of the current error within one step (the rest impulse),
//! compares it with the impulse implied by the observed relative motion weighted by
//! `1 + damping`, and applies `gain` times the difference. Repeated passes settle at
//! a relative velocity of `stiffness / (1 + damping)` of the error per step, so a
//! stiffness of at most 1 never overshoots.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use super::super::vector::{Vec2, wrap_angle};
use super::{Particle, ParticleId, SpringId};

/// Distance constraint between two particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpring {
    /// First endpoint.
    pub a: ParticleId,
    /// Second endpoint.
    pub b: ParticleId,
    /// Length the spring relaxes towards.
    pub rest_length: f32,
    /// Fraction of the length error closed per step.
    pub stiffness: f32,
    /// Extra weight on the observed relative velocity along the spring.
    pub damping: f32,
}

impl LinearSpring {
    /// Current endpoint positions, if both particles still exist.
    pub fn endpoints(&self, particles: &SlotMap<ParticleId, Particle>) -> Option<(Vec2, Vec2)> {
        Some((particles.get(self.a)?.pos, particles.get(self.b)?.pos))
    }

    /// Runs one relaxation pass.
    ///
    /// A spring whose endpoints coincide has no direction and is skipped for this pass.
    pub fn solve(&self, particles: &mut SlotMap<ParticleId, Particle>, dt: f32, gain: f32) {
        let (Some(pa), Some(pb)) = (particles.get(self.a), particles.get(self.b)) else {
            return;
        };
        let inv_sum = pa.inv_mass + pb.inv_mass;
        let delta = pb.pos - pa.pos;
        let dist = delta.length();
        if inv_sum == 0.0 || dist == 0.0 {
            return;
        }

        let normal = delta / dist;
        let error = dist - self.rest_length;
        let relative_speed = (pb.vel - pa.vel).dot(normal);
        let effective_mass = 1.0 / inv_sum;

        let rest_impulse = -effective_mass * self.stiffness * error / dt;
        let observed_impulse = effective_mass * relative_speed;
        let impulse =
            normal * (gain * (rest_impulse - (1.0 + self.damping) * observed_impulse));

        if let Some(pa) = particles.get_mut(self.a) {
            pa.apply_velocity_impulse(-impulse);
        }
        if let Some(pb) = particles.get_mut(self.b) {
            pb.apply_velocity_impulse(impulse);
        }
    }
}

/// Drives the relative angle between two linear springs towards a target.
///
/// The angle is measured counter-clockwise from the first spring's direction to
/// the second's, in `(-π, π]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularSpring {
    /// Reference spring.
    pub first: SpringId,
    /// Driven spring.
    pub second: SpringId,
    /// Target relative angle, set by the controller every tick.
    pub target: f32,
    /// Fraction of the angular error closed per step.
    pub stiffness: f32,
    /// Extra weight on the observed relative angular velocity.
    pub damping: f32,
}

/// Kinematic state of one spring used by the angular solver.
struct Arm {
    a: ParticleId,
    b: ParticleId,
    dir: Vec2,
    angular_velocity: f32,
    effective_mass: f32,
}

impl Arm {
    fn read(spring: &LinearSpring, particles: &SlotMap<ParticleId, Particle>) -> Option<Self> {
        let pa = particles.get(spring.a)?;
        let pb = particles.get(spring.b)?;
        let dir = pb.pos - pa.pos;
        let length_sq = dir.length_squared();
        let inv_sum = pa.inv_mass + pb.inv_mass;
        if length_sq == 0.0 || inv_sum == 0.0 {
            return None;
        }
        Some(Self {
            a: spring.a,
            b: spring.b,
            dir,
            angular_velocity: dir.perp_dot(pb.vel - pa.vel) / length_sq,
            effective_mass: 1.0 / inv_sum,
        })
    }

    /// Changes the arm's angular velocity by `delta` with equal and opposite tangential impulses.
    fn spin(&self, particles: &mut SlotMap<ParticleId, Particle>, delta: f32) {
        // perp(dir) already carries |dir|: this changes the angular velocity by exactly delta.
        let impulse = self.dir.perp() * (self.effective_mass * delta);
        if let Some(pa) = particles.get_mut(self.a) {
            pa.apply_velocity_impulse(-impulse);
        }
        if let Some(pb) = particles.get_mut(self.b) {
            pb.apply_velocity_impulse(impulse);
        }
    }
}

impl AngularSpring {
    /// Current relative angle, if both springs exist and have non-zero length.
    pub fn angle(
        &self,
        springs: &SlotMap<SpringId, LinearSpring>,
        particles: &SlotMap<ParticleId, Particle>,
    ) -> Option<f32> {
        let (a1, b1) = springs.get(self.first)?.endpoints(particles)?;
        let (a2, b2) = springs.get(self.second)?.endpoints(particles)?;
        Some(relative_angle(b1 - a1, b2 - a2))
    }

    /// Runs one relaxation pass.
    pub fn solve(
        &self,
        springs: &SlotMap<SpringId, LinearSpring>,
        particles: &mut SlotMap<ParticleId, Particle>,
        dt: f32,
        gain: f32,
    ) {
        let (Some(first), Some(second)) = (springs.get(self.first), springs.get(self.second))
        else {
            return;
        };
        let (Some(arm1), Some(arm2)) = (Arm::read(first, particles), Arm::read(second, particles))
        else {
            return;
        };

        let error = wrap_angle(relative_angle(arm1.dir, arm2.dir) - self.target);
        let relative_spin = arm2.angular_velocity - arm1.angular_velocity;
        let correction =
            gain * (-self.stiffness * error / dt - (1.0 + self.damping) * relative_spin);

        arm1.spin(particles, -0.5 * correction);
        arm2.spin(particles, 0.5 * correction);
    }
}

/// Signed angle from `from` to `to`. Zero when either vector is degenerate.
pub fn relative_angle(from: Vec2, to: Vec2) -> f32 {
    if from.length_squared() == 0.0 || to.length_squared() == 0.0 {
        return 0.0;
    }
    from.perp_dot(to).atan2(from.dot(to))
}
