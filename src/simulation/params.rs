use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::agent::{AgentParams, SensorParams, check_wiring};
use super::brain::{GenomeCodec, GenomeRanges, NetworkParams};
use super::error::{Result, SimError};
use super::evolution::{FitnessPolarity, GeneticParams};
use super::geometric_utils::Segment;
use super::physics::PhysicsParams;
use super::vector::Vec2;

/// Complete simulation configuration.
///
/// Every section has defaults, so a JSON document only needs the keys it changes:
///
/// ```json
/// { "network": { "layers": [5, 12, 4] }, "scenario": { "population": 50 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Integrator and solver settings.
    pub physics: PhysicsParams,
    /// Brain topology and activation.
    pub network: NetworkParams,
    /// Domain ranges used by the genome codec.
    pub genome: GenomeRanges,
    /// Genetic algorithm operators and rates.
    pub genetic: GeneticParams,
    /// Body plan and material.
    pub agent: AgentParams,
    /// Ray camera.
    pub sensor: SensorParams,
    /// Population, arena and objective.
    pub scenario: ScenarioParams,
}

/// What agents are rewarded for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Reach a target. Fitness is the final centroid distance to `position`;
    /// entering the circle of `radius` completes the challenge.
    Target {
        /// Centre of the target.
        position: Vec2,
        /// Completion radius.
        radius: f32,
    },
    /// Travel far. Fitness is the centroid displacement projected onto `direction`.
    Distance {
        /// Direction of travel that counts as progress.
        direction: Vec2,
    },
    /// Stay alive. Fitness is the number of ticks survived.
    Survival,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::Target {
            position: Vec2::new(200.0, 0.0),
            radius: 10.0,
        }
    }
}

impl Objective {
    /// Polarity under which this objective's fitness makes sense.
    pub fn natural_polarity(&self) -> FitnessPolarity {
        match self {
            Objective::Target { .. } => FitnessPolarity::Minimize,
            Objective::Distance { .. } | Objective::Survival => FitnessPolarity::Maximize,
        }
    }

    /// Fitness of an agent that started at `start`, is now at `centroid` and lived `ticks`.
    pub fn fitness(&self, start: Vec2, centroid: Vec2, ticks: u64) -> f32 {
        match self {
            Objective::Target { position, .. } => centroid.distance(*position),
            Objective::Distance { direction } => (centroid - start).dot(direction.normalize()),
            Objective::Survival => ticks as f32,
        }
    }

    /// Returns `true` once an agent at `centroid` has met the objective.
    pub fn is_complete(&self, centroid: Vec2) -> bool {
        match self {
            Objective::Target { position, radius } => centroid.distance(*position) <= *radius,
            Objective::Distance { .. } | Objective::Survival => false,
        }
    }
}

/// Population, arena and objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    /// Agents per generation.
    pub population: usize,
    /// Ticks after which a still-living agent times out.
    pub max_ticks: u64,
    /// Where every agent's head spawns.
    pub spawn: Vec2,
    /// Initial facing of every agent.
    pub heading: Vec2,
    /// Static wall segments.
    pub walls: Vec<Segment>,
    /// Fitness and completion rule.
    pub objective: Objective,
    /// Seed for genome generation and the genetic algorithm.
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        // A channel from the spawn point towards the default target.
        let channel = |y: f32| Segment::new(Vec2::new(-100.0, y), Vec2::new(300.0, y));
        Self {
            population: 20,
            max_ticks: 600,
            spawn: Vec2::ZERO,
            heading: Vec2::X,
            walls: vec![channel(-60.0), channel(60.0)],
            objective: Objective::default(),
            seed: 42,
        }
    }
}

impl Params {
    /// Parses a JSON document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every section and the consistency between them.
    pub fn validate(&self) -> Result<()> {
        self.validate_physics()?;
        self.validate_network()?;
        GenomeCodec::new(self.genome)?;
        self.genetic.validate()?;
        self.agent.validate()?;
        self.validate_scenario()
    }

    fn validate_physics(&self) -> Result<()> {
        let physics = &self.physics;
        if !(physics.dt.is_finite() && physics.dt > 0.0) {
            return invalid(format!("physics.dt {} must be positive", physics.dt));
        }
        if physics.iterations == 0 {
            return invalid("physics.iterations must be at least 1".to_string());
        }
        if !(physics.solver_gain.is_finite() && physics.solver_gain >= 0.0) {
            return invalid(format!(
                "physics.solver_gain {} must be non-negative",
                physics.solver_gain
            ));
        }
        if !(physics.fluid_density.is_finite() && physics.fluid_density >= 0.0) {
            return invalid(format!(
                "physics.fluid_density {} must be non-negative",
                physics.fluid_density
            ));
        }
        if physics.drag_min.is_nan()
            || physics.drag_max.is_nan()
            || physics.drag_min > physics.drag_max
        {
            return invalid(format!(
                "physics.drag_min {} exceeds drag_max {}",
                physics.drag_min, physics.drag_max
            ));
        }
        if !physics.gravity.is_finite() {
            return invalid("physics.gravity must be finite".to_string());
        }
        Ok(())
    }

    fn validate_network(&self) -> Result<()> {
        let layers = &self.network.layers;
        if layers.len() < 2 {
            return invalid(format!(
                "network needs at least two layers, got {}",
                layers.len()
            ));
        }
        if layers.contains(&0) {
            return invalid("network layers must not be empty".to_string());
        }
        self.sensor.validate()?;
        check_wiring(
            &self.agent,
            &self.sensor,
            layers[0],
            layers[layers.len() - 1],
        )
    }

    fn validate_scenario(&self) -> Result<()> {
        let scenario = &self.scenario;
        if scenario.population == 0 {
            return invalid("scenario.population must be at least 1".to_string());
        }
        if scenario.max_ticks == 0 {
            return invalid("scenario.max_ticks must be at least 1".to_string());
        }
        if scenario.heading.normalize() == Vec2::ZERO {
            return invalid("scenario.heading must be a non-zero vector".to_string());
        }
        match &scenario.objective {
            Objective::Target { radius, .. } if !(radius.is_finite() && *radius >= 0.0) => {
                invalid(format!("target radius {radius} must be non-negative"))
            }
            Objective::Distance { direction } if direction.normalize() == Vec2::ZERO => {
                invalid("distance direction must be a non-zero vector".to_string())
            }
            _ => Ok(()),
        }
    }
}

fn invalid(message: String) -> Result<()> {
    Err(SimError::InvalidConfig(message))
}
