//! Physical bodies and the species plans that build them.
//!
//! A body is a set of handles into the [`World`]: particles joined by springs, with
//! muscles (angular springs) between pairs of springs that the brain drives, and foils
//! on the springs that push against the fluid.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::super::error::{Result, SimError};
use super::super::geometric_utils::{Segment, circle_touches_segment};
use super::super::physics::{FoilId, MuscleId, Particle, ParticleId, SpringId, World};
use super::super::vector::Vec2;
use super::AgentParams;

/// Species of body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPlan {
    /// A chain of segments with a muscle at every joint.
    #[default]
    Worm,
    /// A ring of particles around a hub, with a muscle between neighbouring spokes.
    Blob,
    /// A spine with one two-jointed leg per side at every spine particle but the tail.
    Crab,
}

impl BodyPlan {
    /// Muscles (and therefore brain outputs) of a body with `segments` segments.
    pub fn muscle_count(self, segments: usize) -> usize {
        match self {
            BodyPlan::Worm => segments.saturating_sub(1),
            BodyPlan::Blob => segments,
            BodyPlan::Crab => 4 * segments,
        }
    }

    /// Smallest segment count that yields a connected body with at least one muscle.
    pub fn min_segments(self) -> usize {
        match self {
            BodyPlan::Worm => 2,
            BodyPlan::Blob => 3,
            BodyPlan::Crab => 1,
        }
    }
}

/// Handles of one agent's body inside the world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    /// Plan the body was built from.
    pub plan: BodyPlan,
    /// Particles, in build order.
    pub particles: Vec<ParticleId>,
    /// Linear springs, in build order.
    pub springs: Vec<SpringId>,
    /// Muscles in brain-output order.
    pub muscles: Vec<MuscleId>,
    /// Aerodynamic foils.
    pub foils: Vec<FoilId>,
    base_angles: Vec<f32>,
    head: ParticleId,
    neck: ParticleId,
}

impl Body {
    /// Builds a body at `origin` facing `heading` and registers it with the world.
    ///
    /// The head sits at `origin`; the rest of the body trails behind it. A zero heading
    /// faces +x. Fails before touching the world if the plan has too few segments.
    pub fn build(
        world: &mut World,
        params: &AgentParams,
        origin: Vec2,
        heading: Vec2,
    ) -> Result<Self> {
        let min_segments = params.plan.min_segments();
        if params.segments < min_segments {
            return Err(SimError::InvalidConfig(format!(
                "a {:?} needs at least {min_segments} segments, got {}",
                params.plan, params.segments
            )));
        }

        let mut forward = heading.normalize();
        if forward == Vec2::ZERO {
            forward = Vec2::X;
        }

        let mut body = Body {
            plan: params.plan,
            ..Body::default()
        };
        match params.plan {
            BodyPlan::Worm => body.build_worm(world, params, origin, forward)?,
            BodyPlan::Blob => body.build_blob(world, params, origin, forward)?,
            BodyPlan::Crab => body.build_crab(world, params, origin, forward)?,
        }

        // Muscles rest at the angle they were built with.
        body.base_angles = body
            .muscles
            .iter()
            .map(|&id| world.muscle(id).map_or(0.0, |muscle| muscle.target))
            .collect();
        Ok(body)
    }

    fn build_worm(
        &mut self,
        world: &mut World,
        params: &AgentParams,
        origin: Vec2,
        forward: Vec2,
    ) -> Result<()> {
        let joints: Vec<ParticleId> = (0..=params.segments)
            .map(|i| {
                let pos = origin - forward * (i as f32 * params.segment_length);
                self.add_particle(world, params, pos)
            })
            .collect();

        let mut previous: Option<SpringId> = None;
        for pair in joints.windows(2) {
            let spring = self.add_spring(world, params, pair[0], pair[1])?;
            self.foils.push(world.add_foil(spring)?);
            if let Some(previous) = previous {
                self.add_muscle(world, params, previous, spring)?;
            }
            previous = Some(spring);
        }

        self.head = joints[0];
        self.neck = joints[1];
        Ok(())
    }

    fn build_blob(
        &mut self,
        world: &mut World,
        params: &AgentParams,
        origin: Vec2,
        forward: Vec2,
    ) -> Result<()> {
        let n = params.segments;
        // Chord between neighbouring ring particles equals the segment length.
        let ring_radius = params.segment_length / (2.0 * (PI / n as f32).sin());
        let center_pos = origin - forward * ring_radius;
        let center = self.add_particle(world, params, center_pos);

        let ring: Vec<ParticleId> = (0..n)
            .map(|k| {
                let rotor = Vec2::from_angle(TAU * k as f32 / n as f32);
                let pos = center_pos + forward.rotate(rotor) * ring_radius;
                self.add_particle(world, params, pos)
            })
            .collect();

        let mut spokes = Vec::with_capacity(n);
        for &rim in &ring {
            spokes.push(self.add_spring(world, params, center, rim)?);
        }
        for k in 0..n {
            let hull = self.add_spring(world, params, ring[k], ring[(k + 1) % n])?;
            self.foils.push(world.add_foil(hull)?);
        }
        for k in 0..n {
            self.add_muscle(world, params, spokes[k], spokes[(k + 1) % n])?;
        }

        self.head = ring[0];
        self.neck = center;
        Ok(())
    }

    fn build_crab(
        &mut self,
        world: &mut World,
        params: &AgentParams,
        origin: Vec2,
        forward: Vec2,
    ) -> Result<()> {
        let length = params.segment_length;
        let spine: Vec<ParticleId> = (0..=params.segments)
            .map(|j| self.add_particle(world, params, origin - forward * (j as f32 * length)))
            .collect();

        let mut vertebrae = Vec::with_capacity(params.segments);
        for pair in spine.windows(2) {
            vertebrae.push(self.add_spring(world, params, pair[0], pair[1])?);
        }

        for (j, &vertebra) in vertebrae.iter().enumerate() {
            let hip_pos = origin - forward * (j as f32 * length);
            for side in [1.0, -1.0] {
                let outward = forward.perp() * side;
                let knee_pos = hip_pos + outward * length;
                let foot_pos = knee_pos + outward * length - forward * (0.5 * length);
                let knee = self.add_particle(world, params, knee_pos);
                let foot = self.add_particle(world, params, foot_pos);

                let thigh = self.add_spring(world, params, spine[j], knee)?;
                let shin = self.add_spring(world, params, knee, foot)?;
                self.foils.push(world.add_foil(shin)?);

                self.add_muscle(world, params, vertebra, thigh)?;
                self.add_muscle(world, params, thigh, shin)?;
            }
        }

        self.head = spine[0];
        self.neck = spine[1];
        Ok(())
    }

    fn add_particle(&mut self, world: &mut World, params: &AgentParams, pos: Vec2) -> ParticleId {
        let id = world.add_particle(Particle::new(pos, params.mass, params.radius));
        self.particles.push(id);
        id
    }

    fn add_spring(
        &mut self,
        world: &mut World,
        params: &AgentParams,
        a: ParticleId,
        b: ParticleId,
    ) -> Result<SpringId> {
        let id = world.add_spring(a, b, params.stiffness, params.damping)?;
        self.springs.push(id);
        Ok(id)
    }

    fn add_muscle(
        &mut self,
        world: &mut World,
        params: &AgentParams,
        first: SpringId,
        second: SpringId,
    ) -> Result<MuscleId> {
        let id = world.add_muscle(first, second, params.muscle_stiffness, params.muscle_damping)?;
        self.muscles.push(id);
        Ok(id)
    }

    /// Angle each muscle had when the body was built.
    pub fn base_angles(&self) -> &[f32] {
        &self.base_angles
    }

    /// Position of the head particle.
    pub fn head_position(&self, world: &World) -> Option<Vec2> {
        world.particle(self.head).map(|p| p.pos)
    }

    /// Unit vector from the neck to the head, or zero if either is gone.
    pub fn heading(&self, world: &World) -> Vec2 {
        match (world.particle(self.head), world.particle(self.neck)) {
            (Some(head), Some(neck)) => (head.pos - neck.pos).normalize(),
            _ => Vec2::ZERO,
        }
    }

    /// Unweighted mean of the particle positions.
    pub fn centroid(&self, world: &World) -> Option<Vec2> {
        let (sum, count) = self
            .particles
            .iter()
            .filter_map(|&id| world.particle(id))
            .fold((Vec2::ZERO, 0usize), |(sum, count), p| (sum + p.pos, count + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Current particle positions.
    pub fn positions(&self, world: &World) -> Vec<Vec2> {
        self.particles
            .iter()
            .filter_map(|&id| world.particle(id).map(|p| p.pos))
            .collect()
    }

    /// Current spring endpoints.
    pub fn spring_lines(&self, world: &World) -> Vec<(Vec2, Vec2)> {
        self.springs
            .iter()
            .filter_map(|&id| world.spring_endpoints(id))
            .collect()
    }

    /// Turns brain outputs into muscle targets.
    ///
    /// Muscle `i` targets `base_i + (outputs[i] - output_center) · max_bend`, with the
    /// output offset clamped to `[-1, 1]`.
    pub fn actuate(&self, world: &mut World, outputs: &[f32], params: &AgentParams) -> Result<()> {
        for ((&muscle, &base), &out) in self.muscles.iter().zip(&self.base_angles).zip(outputs) {
            let offset = (out - params.output_center).clamp(-1.0, 1.0);
            let target = base + offset * params.max_bend;
            world.set_muscle_target(muscle, target)?;
        }
        Ok(())
    }

    /// Returns `true` if any particle overlaps any of `walls`.
    pub fn touches(&self, world: &World, walls: &[Segment]) -> bool {
        self.particles
            .iter()
            .filter_map(|&id| world.particle(id))
            .any(|p| {
                walls
                    .iter()
                    .any(|wall| circle_touches_segment(p.pos, p.radius, wall.start, wall.end))
            })
    }

    /// Deletes every part of the body from the world.
    pub fn remove_from(&self, world: &mut World) {
        for &id in &self.foils {
            world.remove_foil(id);
        }
        for &id in &self.muscles {
            world.remove_muscle(id);
        }
        for &id in &self.springs {
            world.remove_spring(id);
        }
        for &id in &self.particles {
            world.remove_particle(id);
        }
    }
}
