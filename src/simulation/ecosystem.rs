//! Generation-based simulation orchestrator.
//!
//! The ecosystem owns the physics world, the static walls and the live population.
//! Each tick every living agent senses, thinks and acts, the world advances one fixed
//! step, and then every agent is checked for completion, wall collision and timeout.
//! Dead agents are encoded into [`Individual`]s; once the whole generation is dead the
//! genetic algorithm breeds the next one, which respawns at the scenario's start pose.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentFactory, DeathCause};
use super::brain::GenomeCodec;
use super::brain::codec::Genome;
use super::error::Result;
use super::evolution::{GeneticAlgorithm, Individual};
use super::geometric_utils::Segment;
use super::params::Params;
use super::physics::World;
use super::snapshot::{AgentPose, WorldSnapshot};
use super::stats::{GenerationStats, StatsHistory};

/// What happened during one [`Ecosystem::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick of the generation that just ran, starting at 1.
    pub tick: u64,
    /// Agents that died this tick.
    pub deaths: usize,
    /// Statistics of the generation, if this tick finished it.
    pub generation_completed: Option<GenerationStats>,
}

/// The simulation: world, population and genetic algorithm.
#[derive(Debug, Clone)]
pub struct Ecosystem {
    params: Params,
    world: World,
    walls: Vec<Segment>,
    factory: AgentFactory,
    genetics: GeneticAlgorithm,
    agents: Vec<Agent>,
    graveyard: Vec<Individual>,
    generation: u32,
    tick: u64,
    next_id: usize,
    completed: usize,
    history: StatsHistory,
    rng: StdRng,
    exhausted: bool,
}

impl Ecosystem {
    /// Validates `params`, builds the walls and spawns a random first generation.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;

        let codec = GenomeCodec::new(params.genome)?;
        let factory = AgentFactory::new(
            params.agent.clone(),
            &params.network,
            params.sensor.clone(),
            codec,
        )?;
        let genetics = GeneticAlgorithm::new(params.genetic.clone())?;

        let natural = params.scenario.objective.natural_polarity();
        if natural != params.genetic.polarity {
            log::warn!(
                "objective {:?} favours {:?} but the genetic algorithm is set to {:?}",
                params.scenario.objective,
                natural,
                params.genetic.polarity
            );
        }

        let mut world = World::new(params.physics.clone());
        for wall in &params.scenario.walls {
            world.add_segment(wall.start, wall.end);
        }
        let walls = world.segments().copied().collect();

        let mut rng = StdRng::seed_from_u64(params.scenario.seed);
        let genomes: Vec<Genome> = (0..params.scenario.population)
            .map(|_| factory.random_genome(&mut rng))
            .collect();

        let mut ecosystem = Self {
            params,
            world,
            walls,
            factory,
            genetics,
            agents: Vec::new(),
            graveyard: Vec::new(),
            generation: 0,
            tick: 0,
            next_id: 0,
            completed: 0,
            history: StatsHistory::default(),
            rng,
            exhausted: false,
        };
        ecosystem.spawn_generation(genomes)?;

        log::info!(
            "spawned {} agents with {} genes each",
            ecosystem.agents.len(),
            ecosystem.factory.genome_len()
        );
        Ok(ecosystem)
    }

    fn spawn_generation(&mut self, genomes: Vec<Genome>) -> Result<()> {
        let spawn = self.params.scenario.spawn;
        let heading = self.params.scenario.heading;

        self.agents = Vec::with_capacity(genomes.len());
        for genome in genomes {
            let id = self.next_id;
            self.next_id += 1;
            let agent = self
                .factory
                .spawn(&mut self.world, id, genome, spawn, heading)?;
            self.agents.push(agent);
        }
        Ok(())
    }

    /// Runs one tick: sense, think, act, integrate, then evaluate every agent.
    ///
    /// If this tick kills the last living agent, the next generation is bred and
    /// spawned before returning. An exhausted run does nothing.
    pub fn step(&mut self) -> Result<TickReport> {
        if self.exhausted {
            return Ok(TickReport {
                tick: self.tick,
                deaths: 0,
                generation_completed: None,
            });
        }

        for agent in self.agents.iter_mut().filter(|agent| agent.is_alive()) {
            agent.update(&mut self.world, &self.walls, &self.params.agent)?;
        }
        self.world.step();
        self.tick += 1;

        let tick = self.tick;
        let deaths = self.evaluate();
        let generation_completed = if self.agents.iter().any(Agent::is_alive) {
            None
        } else {
            Some(self.turn_over()?)
        };

        Ok(TickReport {
            tick,
            deaths,
            generation_completed,
        })
    }

    /// Applies the termination predicates and buries the agents that meet one.
    fn evaluate(&mut self) -> usize {
        let objective = &self.params.scenario.objective;
        let max_ticks = self.params.scenario.max_ticks;
        let mut deaths = 0;

        for agent in self.agents.iter_mut().filter(|agent| agent.is_alive()) {
            agent.ticks_alive += 1;
            let centroid = agent.centroid(&self.world);

            let cause = if objective.is_complete(centroid) {
                DeathCause::Completed
            } else if agent.body.touches(&self.world, &self.walls) {
                DeathCause::Collision
            } else if agent.ticks_alive >= max_ticks {
                DeathCause::Timeout
            } else {
                continue;
            };

            let fitness = objective.fitness(agent.start, centroid, agent.ticks_alive);
            let genome = self.factory.encode(agent);
            agent.kill(&mut self.world, cause, fitness);
            self.graveyard.push(Individual::new(genome, fitness));

            if cause == DeathCause::Completed {
                self.completed += 1;
            }
            deaths += 1;
            log::debug!(
                "agent {} died ({:?}) after {} ticks with fitness {:.3}",
                agent.id,
                cause,
                agent.ticks_alive,
                fitness
            );
        }
        deaths
    }

    /// Breeds and spawns the next generation from the graveyard.
    fn turn_over(&mut self) -> Result<GenerationStats> {
        let stats = GenerationStats::from_individuals(
            self.generation,
            &self.graveyard,
            self.params.genetic.polarity,
            self.completed,
        );
        log::info!(
            "generation {}: best {:.3}, mean {:.3}, worst {:.3}, {}/{} completed",
            stats.generation,
            stats.best,
            stats.mean,
            stats.worst,
            stats.completed,
            stats.individuals
        );

        let genomes = self.genetics.step(&self.graveyard, &mut self.rng);
        self.history.record(stats.clone());
        self.graveyard.clear();
        self.agents.clear();
        self.completed = 0;
        self.tick = 0;
        self.generation += 1;

        if genomes.is_empty() {
            self.exhausted = true;
            log::warn!(
                "generation {} has no offspring; the run is exhausted",
                self.generation
            );
        } else {
            self.spawn_generation(genomes)?;
        }
        Ok(stats)
    }

    /// Ticks until the current generation turns over.
    ///
    /// Returns `None` if the run is exhausted.
    pub fn run_generation(&mut self) -> Result<Option<GenerationStats>> {
        // Every agent times out after `max_ticks`, so this bound is never reached.
        for _ in 0..=self.params.scenario.max_ticks {
            if self.exhausted {
                return Ok(None);
            }
            if let Some(stats) = self.step()?.generation_completed {
                return Ok(Some(stats));
            }
        }
        Ok(None)
    }

    /// Copies out the walls and every agent's pose.
    pub fn snapshot(&self) -> WorldSnapshot {
        let agents = self
            .agents
            .iter()
            .map(|agent| AgentPose {
                id: agent.id,
                color: agent.color,
                particles: agent.body.positions(&self.world),
                springs: agent.body.spring_lines(&self.world),
                heading: agent.body.heading(&self.world),
                alive: agent.is_alive(),
            })
            .collect();

        WorldSnapshot {
            generation: self.generation,
            tick: self.tick,
            segments: self.walls.clone(),
            agents,
        }
    }

    /// Configuration in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The physics world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Static walls.
    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    /// Agents of the current generation, dead or alive.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of living agents.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Individuals of the current generation that have already died.
    pub fn graveyard(&self) -> &[Individual] {
        &self.graveyard
    }

    /// Current generation, starting at 0.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ticks into the current generation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Statistics of finished generations.
    pub fn history(&self) -> &StatsHistory {
        &self.history
    }

    /// Returns `true` once a generation produced no offspring.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
