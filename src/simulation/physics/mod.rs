//! Impulse-based 2D particle physics.
//!
//! The [`World`] owns particles, springs, angular springs ("muscles"), aerodynamic
//! foils and static wall segments. One [`World::step`] runs three phases:
//!
//! 1. **integrate**: accumulated impulses and gravity change velocities, velocities
//!    move positions;
//! 2. **solve**: `iterations` relaxation passes over every constraint, each writing a
//!    corrective velocity impulse scaled by `solver_gain`;
//! 3. **clear**: impulse accumulators are reset.
//!
//! Constraints referencing handles that were removed are skipped, so deleting a body
//! piecemeal never panics.

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

pub mod aero;
pub mod particle;
pub mod spring;

pub use aero::AeroFoil;
pub use particle::Particle;
pub use spring::{AngularSpring, LinearSpring};

use super::error::{Result, SimError};
use super::geometric_utils::Segment;
use super::vector::Vec2;

new_key_type! {
    /// Handle to a particle.
    pub struct ParticleId;
    /// Handle to a linear spring.
    pub struct SpringId;
    /// Handle to an angular spring.
    pub struct MuscleId;
    /// Handle to an aerodynamic foil.
    pub struct FoilId;
    /// Handle to a static wall segment.
    pub struct SegmentId;
}

/// Numeric knobs of the physics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// Relaxation passes per step.
    pub iterations: usize,
    /// Fraction of each constraint's impulse error applied per pass.
    pub solver_gain: f32,
    /// Constant acceleration applied to every free particle.
    pub gravity: Vec2,
    /// Density of the surrounding fluid.
    pub fluid_density: f32,
    /// Drag coefficient of a foil moving edge-on.
    pub drag_min: f32,
    /// Drag coefficient of a foil moving face-on.
    pub drag_max: f32,
    /// Peak lift coefficient, reached at the stall angle.
    pub lift_max: f32,
    /// Angle of attack (radians) at which lift peaks.
    pub stall_angle: f32,
    /// Out-of-plane depth of every foil; area is `length * foil_depth`.
    pub foil_depth: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            iterations: 8,
            solver_gain: 0.25,
            gravity: Vec2::ZERO,
            fluid_density: 1.0,
            drag_min: 0.05,
            drag_max: 1.2,
            lift_max: 0.9,
            stall_angle: std::f32::consts::PI / 12.0,
            foil_depth: 1.0,
        }
    }
}

/// The physical world: dynamic bodies plus static geometry.
#[derive(Debug, Clone, Default)]
pub struct World {
    params: PhysicsParams,
    particles: SlotMap<ParticleId, Particle>,
    springs: SlotMap<SpringId, LinearSpring>,
    muscles: SlotMap<MuscleId, AngularSpring>,
    foils: SlotMap<FoilId, AeroFoil>,
    segments: SlotMap<SegmentId, Segment>,
    ticks: u64,
}

impl World {
    /// Creates an empty world.
    pub fn new(params: PhysicsParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Physics parameters in effect.
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Number of steps taken so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> f32 {
        self.ticks as f32 * self.params.dt
    }

    /// Adds a particle and returns its handle.
    pub fn add_particle(&mut self, particle: Particle) -> ParticleId {
        self.particles.insert(particle)
    }

    /// Adds a static point that never moves.
    pub fn add_point(&mut self, pos: Vec2) -> ParticleId {
        self.particles.insert(Particle::pinned(pos))
    }

    /// Adds a static wall segment.
    pub fn add_segment(&mut self, start: Vec2, end: Vec2) -> SegmentId {
        self.segments.insert(Segment::new(start, end))
    }

    /// Connects two particles with a spring whose rest length is their current distance.
    pub fn add_spring(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        stiffness: f32,
        damping: f32,
    ) -> Result<SpringId> {
        let pa = self.particles.get(a).ok_or(SimError::UnknownHandle("particle"))?;
        let pb = self.particles.get(b).ok_or(SimError::UnknownHandle("particle"))?;
        let rest_length = pa.pos.distance(pb.pos);
        Ok(self.springs.insert(LinearSpring {
            a,
            b,
            rest_length,
            stiffness,
            damping,
        }))
    }

    /// Couples two springs with an angular spring targeting their current relative angle.
    pub fn add_muscle(
        &mut self,
        first: SpringId,
        second: SpringId,
        stiffness: f32,
        damping: f32,
    ) -> Result<MuscleId> {
        if !self.springs.contains_key(first) || !self.springs.contains_key(second) {
            return Err(SimError::UnknownHandle("spring"));
        }
        let mut muscle = AngularSpring {
            first,
            second,
            target: 0.0,
            stiffness,
            damping,
        };
        muscle.target = muscle.angle(&self.springs, &self.particles).unwrap_or(0.0);
        Ok(self.muscles.insert(muscle))
    }

    /// Turns a spring into an aerodynamic foil.
    pub fn add_foil(&mut self, spring: SpringId) -> Result<FoilId> {
        if !self.springs.contains_key(spring) {
            return Err(SimError::UnknownHandle("spring"));
        }
        Ok(self.foils.insert(AeroFoil { spring }))
    }

    /// Sets the target angle of a muscle.
    pub fn set_muscle_target(&mut self, id: MuscleId, angle: f32) -> Result<()> {
        let muscle = self
            .muscles
            .get_mut(id)
            .ok_or(SimError::UnknownHandle("muscle"))?;
        muscle.target = angle;
        Ok(())
    }

    /// Current relative angle of a muscle's two springs.
    pub fn muscle_angle(&self, id: MuscleId) -> Option<f32> {
        self.muscles.get(id)?.angle(&self.springs, &self.particles)
    }

    /// Queues an impulse on a particle; it takes effect in the next integration.
    pub fn apply_impulse(&mut self, id: ParticleId, impulse: Vec2) -> Result<()> {
        let particle = self
            .particles
            .get_mut(id)
            .ok_or(SimError::UnknownHandle("particle"))?;
        particle.impulse += impulse;
        Ok(())
    }

    /// Removes a particle.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        self.particles.remove(id)
    }

    /// Removes a spring.
    pub fn remove_spring(&mut self, id: SpringId) -> Option<LinearSpring> {
        self.springs.remove(id)
    }

    /// Removes a muscle.
    pub fn remove_muscle(&mut self, id: MuscleId) -> Option<AngularSpring> {
        self.muscles.remove(id)
    }

    /// Removes a foil.
    pub fn remove_foil(&mut self, id: FoilId) -> Option<AeroFoil> {
        self.foils.remove(id)
    }

    /// Removes a wall segment.
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<Segment> {
        self.segments.remove(id)
    }

    /// Looks up a particle.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Looks up a spring.
    pub fn spring(&self, id: SpringId) -> Option<&LinearSpring> {
        self.springs.get(id)
    }

    /// Looks up a muscle.
    pub fn muscle(&self, id: MuscleId) -> Option<&AngularSpring> {
        self.muscles.get(id)
    }

    /// Current endpoint positions of a spring.
    pub fn spring_endpoints(&self, id: SpringId) -> Option<(Vec2, Vec2)> {
        self.springs.get(id)?.endpoints(&self.particles)
    }

    /// All particles.
    pub fn particles(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    /// All wall segments.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Number of live particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of live springs.
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Number of live muscles.
    pub fn muscle_count(&self) -> usize {
        self.muscles.len()
    }

    /// Number of live foils.
    pub fn foil_count(&self) -> usize {
        self.foils.len()
    }

    /// Number of wall segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Advances the world by one fixed timestep.
    pub fn step(&mut self) {
        let dt = self.params.dt;
        let gain = self.params.solver_gain;
        let iterations = self.params.iterations.max(1);
        let pass_dt = dt / iterations as f32;

        for particle in self.particles.values_mut() {
            particle.integrate(self.params.gravity, dt);
        }

        for _ in 0..iterations {
            for spring in self.springs.values() {
                spring.solve(&mut self.particles, dt, gain);
            }
            for muscle in self.muscles.values() {
                muscle.solve(&self.springs, &mut self.particles, dt, gain);
            }
            for foil in self.foils.values() {
                foil.apply(&self.springs, &mut self.particles, &self.params, pass_dt);
            }
        }

        for particle in self.particles.values_mut() {
            particle.impulse = Vec2::ZERO;
        }

        self.ticks += 1;
        log::trace!(
            "physics tick {}: {} particles, {} springs, {} muscles, {} foils",
            self.ticks,
            self.particles.len(),
            self.springs.len(),
            self.muscles.len(),
            self.foils.len()
        );
    }
}
