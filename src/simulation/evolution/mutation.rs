//! Per-gene mutation operators.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::brain::codec::Genome;
use super::super::error::{Result, SimError};

/// How individual genes are perturbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "func", rename_all = "snake_case")]
pub enum Mutation {
    /// With probability `chance`, replace a gene with a fresh value uniform in `[min_value, max_value]`.
    Uniform {
        /// Per-gene mutation probability.
        chance: f32,
        /// Lower bound of replacement values.
        min_value: f32,
        /// Upper bound of replacement values.
        max_value: f32,
    },
    /// With probability `chance`, nudge a gene by up to `±step`, clamped to `[0, 1]`.
    Creep {
        /// Per-gene mutation probability.
        chance: f32,
        /// Largest perturbation.
        step: f32,
    },
}

impl Mutation {
    pub(super) fn validate(&self) -> Result<()> {
        let chance = match *self {
            Mutation::Uniform {
                chance,
                min_value,
                max_value,
            } => {
                if !(min_value.is_finite() && max_value.is_finite() && min_value <= max_value) {
                    return Err(SimError::InvalidConfig(format!(
                        "mutation bounds [{min_value}, {max_value}] are invalid"
                    )));
                }
                chance
            }
            Mutation::Creep { chance, step } => {
                if !(step.is_finite() && step >= 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "creep step {step} must be finite and non-negative"
                    )));
                }
                chance
            }
        };
        if !(0.0..=1.0).contains(&chance) {
            return Err(SimError::InvalidConfig(format!(
                "mutation chance {chance} must be within [0, 1]"
            )));
        }
        Ok(())
    }

    /// Mutates `genome` in place and returns the number of genes changed.
    pub fn mutate<R: Rng + ?Sized>(&self, genome: &mut Genome, rng: &mut R) -> usize {
        let mut mutated = 0;
        match *self {
            Mutation::Uniform {
                chance,
                min_value,
                max_value,
            } => {
                for gene in genome.iter_mut() {
                    if rng.random::<f32>() < chance {
                        *gene = rng.random_range(min_value..=max_value);
                        mutated += 1;
                    }
                }
            }
            Mutation::Creep { chance, step } => {
                for gene in genome.iter_mut() {
                    if rng.random::<f32>() < chance {
                        let nudge = rng.random::<f32>() * 2.0 - 1.0; // Range: [-1, 1]
                        *gene = (*gene + nudge * step).clamp(0.0, 1.0);
                        mutated += 1;
                    }
                }
            }
        }
        mutated
    }
}
