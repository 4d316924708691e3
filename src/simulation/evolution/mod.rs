//! Generational genetic algorithm.
//!
//! One [`GeneticAlgorithm::step`] turns a population of scored [`Individual`]s into
//! exactly as many genomes for the next generation:
//!
//! 1. **elitism**: the best `elitism_rate · N` genomes are copied unchanged;
//! 2. **gemmation**: `gemmation_rate · N` genomes are mutated clones of one selected parent;
//! 3. **sexual reproduction** fills the rest: select parents, recombine, mutate.
//!
//! The operators only assume genomes are arrays of reals of comparable length.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod crossover;
pub mod mutation;
pub mod selection;

pub use crossover::Crossover;
pub use mutation::Mutation;
pub use selection::Selection;

use super::brain::codec::Genome;
use super::error::{Result, SimError};

/// A genome paired with the fitness it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Encoded brain.
    pub genome: Genome,
    /// Fitness; whether lower or higher is better depends on [`FitnessPolarity`].
    pub fitness: f32,
}

impl Individual {
    /// Pairs a genome with its fitness.
    pub fn new(genome: Genome, fitness: f32) -> Self {
        Self { genome, fitness }
    }
}

/// Which direction of fitness counts as better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessPolarity {
    /// Lower fitness is better (costs such as remaining distance).
    #[default]
    Minimize,
    /// Higher fitness is better (rewards such as progress).
    Maximize,
}

impl FitnessPolarity {
    /// Orders two fitness values so that the better one compares as `Less`.
    ///
    /// NaN is always worse than any number.
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                FitnessPolarity::Minimize => a.total_cmp(&b),
                FitnessPolarity::Maximize => b.total_cmp(&a),
            },
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f32, b: f32) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Genetic algorithm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    /// Whether lower or higher fitness wins.
    pub polarity: FitnessPolarity,
    /// Fraction of the next generation produced by mutated cloning.
    pub gemmation_rate: f32,
    /// Fraction of the next generation copied unchanged from the best individuals.
    pub elitism_rate: f32,
    /// Parent selection operator.
    pub selection: Selection,
    /// Recombination operator.
    pub crossover: Crossover,
    /// Per-gene mutation operator.
    pub mutation: Mutation,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            polarity: FitnessPolarity::Minimize,
            gemmation_rate: 0.1,
            elitism_rate: 0.1,
            selection: Selection::Tournament {
                num_parents: 2,
                max_contestants: 4,
            },
            crossover: Crossover::WholeArithmetic { num_children: 2 },
            mutation: Mutation::Uniform {
                chance: 0.05,
                min_value: 0.0,
                max_value: 1.0,
            },
        }
    }
}

impl GeneticParams {
    /// Checks rates and operator parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("gemmation_rate", self.gemmation_rate),
            ("elitism_rate", self.elitism_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} {rate} must be within [0, 1]"
                )));
            }
        }
        if self.gemmation_rate + self.elitism_rate > 1.0 + f32::EPSILON {
            return Err(SimError::InvalidConfig(format!(
                "gemmation_rate + elitism_rate = {} exceeds 1",
                self.gemmation_rate + self.elitism_rate
            )));
        }
        self.selection.validate()?;
        self.crossover.validate()?;
        self.mutation.validate()
    }
}

/// Runs generational steps with a fixed configuration.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    params: GeneticParams,
}

impl GeneticAlgorithm {
    /// Creates the engine after validating its configuration.
    pub fn new(params: GeneticParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Configuration in use.
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// Indices of `population` sorted best first. Ties keep their original order.
    pub fn rank(&self, population: &[Individual]) -> Vec<usize> {
        let polarity = self.params.polarity;
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| polarity.compare(population[a].fitness, population[b].fitness));
        order
    }

    /// Best individual of a population, if any.
    pub fn fittest<'a>(&self, population: &'a [Individual]) -> Option<&'a Individual> {
        self.rank(population).first().map(|&index| &population[index])
    }

    /// Produces exactly `population.len()` genomes for the next generation.
    ///
    /// An empty population yields an empty generation.
    pub fn step<R: Rng + ?Sized>(&self, population: &[Individual], rng: &mut R) -> Vec<Genome> {
        let size = population.len();
        if size == 0 {
            log::warn!("genetic step received an empty population");
            return Vec::new();
        }

        let params = &self.params;
        let num_elite = ((params.elitism_rate * size as f32).floor() as usize).min(size);
        let num_gemmation =
            ((params.gemmation_rate * size as f32).floor() as usize).min(size - num_elite);

        let mut next: Vec<Genome> = Vec::with_capacity(size);
        next.extend(
            self.rank(population)
                .into_iter()
                .take(num_elite)
                .map(|index| population[index].genome.clone()),
        );

        for _ in 0..num_gemmation {
            let parents = params.selection.select(population, params.polarity, rng);
            let mut clone = parents[0].genome.clone();
            params.mutation.mutate(&mut clone, rng);
            next.push(clone);
        }

        while next.len() < size {
            let parents = params.selection.select(population, params.polarity, rng);
            let genomes: Vec<&Genome> = parents.iter().map(|parent| &parent.genome).collect();
            for mut child in params.crossover.recombine(&genomes, rng) {
                if next.len() == size {
                    break;
                }
                params.mutation.mutate(&mut child, rng);
                next.push(child);
            }
        }

        log::debug!(
            "genetic step: {} elite, {} gemmation, {} offspring",
            num_elite,
            num_gemmation,
            size - num_elite - num_gemmation
        );
        next
    }
}
