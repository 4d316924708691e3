use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::evolution::{FitnessPolarity, Individual};

/// Fitness summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number, starting at 0.
    pub generation: u32,
    /// Individuals handed to the genetic algorithm.
    pub individuals: usize,
    /// Best fitness under the configured polarity.
    pub best: f32,
    /// Mean over finite fitness values (NaN if there are none).
    pub mean: f32,
    /// Worst non-NaN fitness.
    pub worst: f32,
    /// Agents that met the objective.
    pub completed: usize,
}

impl GenerationStats {
    /// Summarizes a generation's individuals.
    pub fn from_individuals(
        generation: u32,
        individuals: &[Individual],
        polarity: FitnessPolarity,
        completed: usize,
    ) -> Self {
        let mut best = f32::NAN;
        let mut worst = f32::NAN;
        let mut sum = 0.0;
        let mut finite = 0usize;

        for individual in individuals {
            let fitness = individual.fitness;
            if fitness.is_nan() {
                continue;
            }
            if best.is_nan() || polarity.is_better(fitness, best) {
                best = fitness;
            }
            if worst.is_nan() || polarity.is_better(worst, fitness) {
                worst = fitness;
            }
            if fitness.is_finite() {
                sum += fitness;
                finite += 1;
            }
        }

        Self {
            generation,
            individuals: individuals.len(),
            best,
            mean: if finite > 0 { sum / finite as f32 } else { f32::NAN },
            worst,
            completed,
        }
    }
}

/// Bounded history of generation statistics, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Recorded generations.
    pub entries: VecDeque<GenerationStats>,
    /// Maximum number of generations kept
    pub max_history: usize,
}

impl Default for StatsHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            max_history: 1000,
        }
    }
}

impl StatsHistory {
    /// Record a generation, dropping the oldest entry when full
    pub fn record(&mut self, stats: GenerationStats) {
        self.entries.push_back(stats);
        while self.entries.len() > self.max_history {
            self.entries.pop_front();
        }
    }

    /// Most recent generation.
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.entries.back()
    }

    /// Best fitness seen across the kept history.
    pub fn best_ever(&self, polarity: FitnessPolarity) -> Option<f32> {
        self.entries
            .iter()
            .map(|stats| stats.best)
            .filter(|best| !best.is_nan())
            .reduce(|a, b| if polarity.is_better(b, a) { b } else { a })
    }

    /// Number of generations kept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
