//! Parent selection operators.

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::super::error::{Result, SimError};
use super::{FitnessPolarity, Individual};

/// How parents are drawn from a scored population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "func", rename_all = "snake_case")]
pub enum Selection {
    /// Sample `max_contestants` distinct candidates and keep the best `num_parents`.
    Tournament {
        /// Winners returned per selection.
        num_parents: usize,
        /// Candidates sampled per tournament (capped at the population size).
        max_contestants: usize,
    },
    /// Fitness-proportionate sampling with replacement.
    Roulette {
        /// Parents returned per selection.
        num_parents: usize,
    },
}

impl Selection {
    /// Parents returned by one call to [`Selection::select`].
    pub fn num_parents(&self) -> usize {
        match *self {
            Selection::Tournament { num_parents, .. } | Selection::Roulette { num_parents } => {
                num_parents
            }
        }
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.num_parents() == 0 {
            return Err(SimError::InvalidConfig(
                "selection must return at least one parent".to_string(),
            ));
        }
        if let Selection::Tournament {
            max_contestants: 0, ..
        } = self
        {
            return Err(SimError::InvalidConfig(
                "tournament needs at least one contestant".to_string(),
            ));
        }
        Ok(())
    }

    /// Draws parents from a non-empty population.
    ///
    /// Always returns [`Selection::num_parents`] references (zero for an empty population).
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a [Individual],
        polarity: FitnessPolarity,
        rng: &mut R,
    ) -> Vec<&'a Individual> {
        if population.is_empty() {
            return Vec::new();
        }
        match *self {
            Selection::Tournament {
                num_parents,
                max_contestants,
            } => tournament(population, polarity, num_parents, max_contestants, rng),
            Selection::Roulette { num_parents } => roulette(population, polarity, num_parents, rng),
        }
    }
}

fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    polarity: FitnessPolarity,
    num_parents: usize,
    max_contestants: usize,
    rng: &mut R,
) -> Vec<&'a Individual> {
    let contestants = max_contestants.clamp(1, population.len());
    let mut drawn = index::sample(rng, population.len(), contestants).into_vec();
    drawn.sort_by(|&a, &b| polarity.compare(population[a].fitness, population[b].fitness));

    // Fewer contestants than parents: winners repeat in rank order.
    (0..num_parents)
        .map(|i| &population[drawn[i % drawn.len()]])
        .collect()
}

fn roulette<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    polarity: FitnessPolarity,
    num_parents: usize,
    rng: &mut R,
) -> Vec<&'a Individual> {
    let finite = population.iter().map(|i| i.fitness).filter(|f| f.is_finite());
    let (lo, hi) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), f| {
        (lo.min(f), hi.max(f))
    });

    // Shift so the worst finite individual still gets a small slice of the wheel.
    let epsilon = ((hi - lo) * 1e-3).max(1e-6);
    let weights: Vec<f32> = population
        .iter()
        .map(|individual| {
            let f = individual.fitness;
            if !f.is_finite() {
                0.0
            } else {
                match polarity {
                    FitnessPolarity::Minimize => hi - f + epsilon,
                    FitnessPolarity::Maximize => f - lo + epsilon,
                }
            }
        })
        .collect();
    let total: f32 = weights.iter().sum();

    (0..num_parents)
        .map(|_| {
            if !(total.is_finite() && total > 0.0) {
                return &population[rng.random_range(0..population.len())];
            }
            let mut ball = rng.random::<f32>() * total;
            for (individual, &weight) in population.iter().zip(&weights) {
                if ball < weight {
                    return individual;
                }
                ball -= weight;
            }
            // Rounding left the ball past the last slot.
            &population[population.len() - 1]
        })
        .collect()
}
