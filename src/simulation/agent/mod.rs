//! Agents: a body, a brain and a ray camera evolving together.

use std::f32::consts::FRAC_PI_2;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod body;

pub use body::{Body, BodyPlan};

use super::brain::codec::Genome;
use super::brain::{GenomeCodec, Network, NetworkParams};
use super::error::{Result, SimError};
use super::geometric_utils::Segment;
use super::physics::World;
use super::raycast::RayCamera;
use super::vector::Vec2;

/// Body section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    /// Species.
    pub plan: BodyPlan,
    /// Segment count; see [`BodyPlan::muscle_count`].
    pub segments: usize,
    /// Rest length of one segment.
    pub segment_length: f32,
    /// Particle radius, used for wall collisions.
    pub radius: f32,
    /// Particle mass.
    pub mass: f32,
    /// RGB colour tag handed to renderers.
    pub color: [u8; 3],
    /// Linear spring stiffness.
    pub stiffness: f32,
    /// Linear spring damping.
    pub damping: f32,
    /// Muscle stiffness.
    pub muscle_stiffness: f32,
    /// Muscle damping.
    pub muscle_damping: f32,
    /// Bend in radians per unit of brain output.
    pub max_bend: f32,
    /// Brain output that leaves a muscle at its rest angle.
    pub output_center: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            plan: BodyPlan::Worm,
            segments: 5,
            segment_length: 10.0,
            radius: 2.0,
            mass: 1.0,
            color: [230, 120, 40],
            stiffness: 0.8,
            damping: 0.3,
            muscle_stiffness: 0.5,
            muscle_damping: 0.2,
            max_bend: 0.6,
            output_center: 0.0,
        }
    }
}

impl AgentParams {
    /// Rejects bodies that cannot be built or would not move.
    pub fn validate(&self) -> Result<()> {
        let min_segments = self.plan.min_segments();
        if self.segments < min_segments {
            return invalid(format!(
                "a {:?} needs at least {min_segments} segments, got {}",
                self.plan, self.segments
            ));
        }
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return invalid(format!(
                "agent.segment_length {} must be positive",
                self.segment_length
            ));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return invalid(format!("agent.mass {} must be positive", self.mass));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return invalid(format!("agent.radius {} must be non-negative", self.radius));
        }
        if !(0.0..=FRAC_PI_2).contains(&self.max_bend) {
            return invalid(format!(
                "agent.max_bend {} must be within [0, π/2]",
                self.max_bend
            ));
        }
        if !self.output_center.is_finite() {
            return invalid("agent.output_center must be finite".to_string());
        }
        Ok(())
    }
}

/// Vision section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorParams {
    /// Number of rays; must match the network's input width.
    pub rays: usize,
    /// Field of view in radians.
    pub fov: f32,
    /// Sentinel reading of a ray that hits nothing.
    pub miss_distance: f32,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            rays: 5,
            fov: FRAC_PI_2,
            miss_distance: 1.0e4,
        }
    }
}

impl SensorParams {
    /// Rejects cameras without rays or with a non-finite field of view.
    pub fn validate(&self) -> Result<()> {
        if self.rays == 0 {
            return invalid("sensor.rays must be at least 1".to_string());
        }
        if !(self.fov.is_finite() && self.fov >= 0.0) {
            return invalid(format!("sensor.fov {} must be non-negative", self.fov));
        }
        if !self.miss_distance.is_finite() {
            return invalid("sensor.miss_distance must be finite".to_string());
        }
        Ok(())
    }
}

/// Checks that a brain with the given input and output widths fits the sensor and body.
///
/// The input layer reads one value per ray and the output layer drives one muscle per
/// output.
pub fn check_wiring(
    agent: &AgentParams,
    sensor: &SensorParams,
    inputs: usize,
    outputs: usize,
) -> Result<()> {
    if inputs != sensor.rays {
        return invalid(format!(
            "network input width {inputs} does not match sensor.rays {}",
            sensor.rays
        ));
    }
    let muscles = agent.plan.muscle_count(agent.segments);
    if outputs != muscles {
        return invalid(format!(
            "network output width {outputs} does not match the {muscles} muscles of a {:?} with {} segments",
            agent.plan, agent.segments
        ));
    }
    Ok(())
}

fn invalid(message: String) -> Result<()> {
    Err(SimError::InvalidConfig(message))
}

/// Why an agent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Lived for the generation's full tick budget.
    Timeout,
    /// Touched a wall.
    Collision,
    /// Reached the scenario objective.
    Completed,
}

/// A simulated creature.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique across the whole run.
    pub id: usize,
    /// Handles of the body inside the world.
    pub body: Body,
    /// Controller.
    pub brain: Network,
    /// Vision.
    pub camera: RayCamera,
    /// Genome the brain was decoded from.
    pub genome: Genome,
    /// Fitness, final once the agent is dead.
    pub fitness: f32,
    /// Ticks survived so far.
    pub ticks_alive: u64,
    /// Colour tag.
    pub color: [u8; 3],
    /// Body centroid at spawn.
    pub start: Vec2,
    death: Option<DeathCause>,
    readings: Array1<f32>,
}

impl Agent {
    /// Returns `true` until the agent dies.
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Why the agent died, if it has.
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Readings from the last [`Agent::sense`].
    pub fn readings(&self) -> &Array1<f32> {
        &self.readings
    }

    /// Aims the camera from the head along the body's heading and casts every ray.
    pub fn sense(&mut self, world: &World, walls: &[Segment]) {
        let position = self
            .body
            .head_position(world)
            .unwrap_or(self.camera.position());
        self.camera.aim(position, self.body.heading(world));
        if let Some(out) = self.readings.as_slice_mut() {
            self.camera.sense_into(walls, out);
        }
    }

    /// Runs the brain on the last readings.
    pub fn think(&mut self) -> Result<Array1<f32>> {
        self.brain.think(&self.readings)
    }

    /// One full sense, think and act cycle.
    pub fn update(&mut self, world: &mut World, walls: &[Segment], params: &AgentParams) -> Result<()> {
        self.sense(world, walls);
        let outputs = self.think()?;
        match outputs.as_slice() {
            Some(slice) => self.body.actuate(world, slice, params),
            None => self.body.actuate(world, &outputs.to_vec(), params),
        }
    }

    /// Current body centroid, or the spawn centroid once the body is gone.
    pub fn centroid(&self, world: &World) -> Vec2 {
        self.body.centroid(world).unwrap_or(self.start)
    }

    /// Marks the agent dead, freezes its fitness and removes its body from the world.
    pub fn kill(&mut self, world: &mut World, cause: DeathCause, fitness: f32) {
        self.death = Some(cause);
        self.fitness = fitness;
        self.body.remove_from(world);
    }
}

/// Builds agents from a fixed set of body, brain and sensor parameters.
#[derive(Debug, Clone)]
pub struct AgentFactory {
    agent: AgentParams,
    sensor: SensorParams,
    codec: GenomeCodec,
    template: Network,
}

impl AgentFactory {
    /// Creates a factory.
    ///
    /// Fails with [`SimError::InvalidConfig`] if the body or camera is invalid, or if
    /// the network's input width differs from the ray count or its output width from
    /// the muscle count.
    pub fn new(
        agent: AgentParams,
        network: &NetworkParams,
        sensor: SensorParams,
        codec: GenomeCodec,
    ) -> Result<Self> {
        agent.validate()?;
        sensor.validate()?;
        let template = Network::from_params(network)?;
        check_wiring(&agent, &sensor, template.input_size(), template.output_size())?;

        Ok(Self {
            agent,
            sensor,
            codec,
            template,
        })
    }

    /// Body parameters.
    pub fn agent_params(&self) -> &AgentParams {
        &self.agent
    }

    /// Codec used to decode and encode brains.
    pub fn codec(&self) -> &GenomeCodec {
        &self.codec
    }

    /// Genome length of every agent this factory builds.
    pub fn genome_len(&self) -> usize {
        self.template.parameter_count()
    }

    /// Draws a random genome of the right length.
    pub fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome {
        GenomeCodec::create_random_genome(&self.template, rng)
    }

    /// Builds a body in `world`, decodes `genome` into a brain and returns the agent.
    ///
    /// Nothing is added to the world if the genome does not fit the topology.
    pub fn spawn(
        &self,
        world: &mut World,
        id: usize,
        genome: Genome,
        origin: Vec2,
        heading: Vec2,
    ) -> Result<Agent> {
        let mut brain = self.template.clone();
        self.codec.decode(&mut brain, &genome)?;

        let body = Body::build(world, &self.agent, origin, heading)?;
        let start = body.centroid(world).unwrap_or(origin);
        let mut camera = RayCamera::new(self.sensor.rays, self.sensor.fov, self.sensor.miss_distance);
        camera.aim(origin, heading);

        Ok(Agent {
            id,
            body,
            brain,
            camera,
            genome,
            fitness: 0.0,
            ticks_alive: 0,
            color: self.agent.color,
            start,
            death: None,
            readings: Array1::zeros(self.sensor.rays),
        })
    }

    /// Encodes an agent's current brain.
    pub fn encode(&self, agent: &Agent) -> Genome {
        self.codec.encode(&agent.brain)
    }
}
