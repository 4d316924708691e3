//! Aerodynamic (fluid drag and lift) constraint on a spring treated as a flat foil.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use super::super::vector::Vec2;
use super::{LinearSpring, Particle, ParticleId, PhysicsParams, SpringId};

/// A flat plate spanning a spring that pushes against the surrounding fluid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AeroFoil {
    /// The spring whose endpoints bound the plate.
    pub spring: SpringId,
}

/// Drag coefficient for an angle of attack: `c_min + sin²(aoa) · (c_max - c_min)`.
pub fn drag_coefficient(aoa: f32, c_min: f32, c_max: f32) -> f32 {
    let s = aoa.sin();
    c_min + s * s * (c_max - c_min)
}

/// Lift coefficient for an angle of attack in `[0, 2π)`.
///
/// The curve is symmetric about `aoa = π`. On `[0, π]` it rises as a quarter sine
/// to `c_max` at the stall angle, swings through zero to `-c_max` on a half cosine
/// until `π - stall`, and returns to zero on a final quarter sine.
pub fn lift_coefficient(aoa: f32, c_max: f32, stall: f32) -> f32 {
    let aoa = aoa.rem_euclid(TAU);
    let a = if aoa > PI { TAU - aoa } else { aoa };
    let stall = stall.clamp(f32::EPSILON, FRAC_PI_2);

    if a < stall {
        c_max * (a / stall * FRAC_PI_2).sin()
    } else if a <= PI - stall {
        let span = PI - 2.0 * stall;
        if span <= 0.0 {
            return 0.0;
        }
        c_max * ((a - stall) / span * PI).cos()
    } else {
        -c_max * ((PI - a) / stall * FRAC_PI_2).sin()
    }
}

impl AeroFoil {
    /// Applies drag and lift for a slice of the step lasting `dt`.
    ///
    /// The plate moves with the mean velocity `v` of its endpoints through a fluid at
    /// rest and feels `0.5 · ρ · |v|² · area` scaled by the drag and lift coefficients.
    /// Both are integrated in closed form over the slice: drag divides the plate speed
    /// by `1 + k·c_d·|v|·dt` and lift turns `v` by `k·c_l·|v|·dt` radians, where `k` is
    /// the pressure factor per unit mass. A plate therefore never speeds up. Stationary,
    /// zero-length or immovable plates feel nothing.
    pub fn apply(
        &self,
        springs: &SlotMap<SpringId, LinearSpring>,
        particles: &mut SlotMap<ParticleId, Particle>,
        params: &PhysicsParams,
        dt: f32,
    ) {
        let Some(spring) = springs.get(self.spring) else {
            return;
        };
        let (Some(pa), Some(pb)) = (particles.get(spring.a), particles.get(spring.b)) else {
            return;
        };

        let velocity = (pa.vel + pb.vel) * 0.5;
        let speed = velocity.length();
        let surface = pb.pos - pa.pos;
        let length = surface.length();
        let inv_mass_sum = pa.inv_mass + pb.inv_mass;
        if speed == 0.0 || length == 0.0 || inv_mass_sum == 0.0 {
            return;
        }

        let aoa = surface.perp_dot(velocity).atan2(surface.dot(velocity)).rem_euclid(TAU);
        let cd = drag_coefficient(aoa, params.drag_min, params.drag_max);
        let cl = lift_coefficient(aoa, params.lift_max, params.stall_angle);

        // Mean-velocity response to a force shared equally by both endpoints.
        let area = length * params.foil_depth;
        let k = 0.5 * params.fluid_density * area * inv_mass_sum * 0.25;

        // Positive lift points along -perp(flow) below π and +perp(flow) above.
        let side = if aoa < PI { -1.0 } else { 1.0 };
        let turn = side * cl * k * speed * dt;
        let slowed = velocity.rotate(Vec2::from_angle(turn)) / (1.0 + cd * k * speed * dt);

        let impulse = (slowed - velocity) * (2.0 / inv_mass_sum);
        if let Some(pa) = particles.get_mut(spring.a) {
            pa.apply_velocity_impulse(impulse);
        }
        if let Some(pb) = particles.get_mut(spring.b) {
            pb.apply_velocity_impulse(impulse);
        }
    }
}
