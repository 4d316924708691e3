//! Recombination operators.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::brain::codec::Genome;
use super::super::error::{Result, SimError};

/// How parent genomes are combined into children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "func", rename_all = "snake_case")]
pub enum Crossover {
    /// Each child is a random convex blend of all parents.
    WholeArithmetic {
        /// Children produced per call.
        num_children: usize,
    },
    /// Each gene of each child is copied from a randomly chosen parent.
    Uniform {
        /// Children produced per call.
        num_children: usize,
    },
    /// Each child takes a prefix of one parent and the suffix of the next.
    SinglePoint {
        /// Children produced per call.
        num_children: usize,
    },
}

impl Crossover {
    /// Children produced by one call to [`Crossover::recombine`].
    pub fn num_children(&self) -> usize {
        match *self {
            Crossover::WholeArithmetic { num_children }
            | Crossover::Uniform { num_children }
            | Crossover::SinglePoint { num_children } => num_children,
        }
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.num_children() == 0 {
            return Err(SimError::InvalidConfig(
                "crossover must produce at least one child".to_string(),
            ));
        }
        Ok(())
    }

    /// Combines `parents` into [`Crossover::num_children`] children.
    ///
    /// Children have the length of the first parent; where another parent is shorter,
    /// the first parent's gene is used. No parents means no children.
    pub fn recombine<R: Rng + ?Sized>(&self, parents: &[&Genome], rng: &mut R) -> Vec<Genome> {
        let Some(&first) = parents.first() else {
            return Vec::new();
        };
        (0..self.num_children())
            .map(|child| match self {
                Crossover::WholeArithmetic { .. } => whole_arithmetic(first, parents, rng),
                Crossover::Uniform { .. } => uniform(first, parents, rng),
                Crossover::SinglePoint { .. } => single_point(parents, child, rng),
            })
            .collect()
    }
}

/// `child = p0 + Σ wₖ·(pₖ - p0)` with random weights summing to one across all parents.
///
/// Written relative to the first parent so identical parents reproduce exactly.
fn whole_arithmetic<R: Rng + ?Sized>(first: &Genome, parents: &[&Genome], rng: &mut R) -> Genome {
    let raw: Vec<f32> = parents.iter().map(|_| rng.random::<f32>()).collect();
    let total: f32 = raw.iter().sum();
    let weights: Vec<f32> = if total > 0.0 {
        raw.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / parents.len() as f32; parents.len()]
    };

    let mut child = first.clone();
    for (parent, &weight) in parents.iter().zip(&weights).skip(1) {
        for (i, gene) in child.iter_mut().enumerate() {
            if let Some(&other) = parent.get(i) {
                *gene += weight * (other - first[i]);
            }
        }
    }
    child
}

fn uniform<R: Rng + ?Sized>(first: &Genome, parents: &[&Genome], rng: &mut R) -> Genome {
    let mut child = first.clone();
    for (i, gene) in child.iter_mut().enumerate() {
        let donor = parents[rng.random_range(0..parents.len())];
        if let Some(&value) = donor.get(i) {
            *gene = value;
        }
    }
    child
}

/// Child `k` pairs parent `k` with parent `k + 1` (wrapping), cut at a random gene.
fn single_point<R: Rng + ?Sized>(parents: &[&Genome], child: usize, rng: &mut R) -> Genome {
    let head = parents[child % parents.len()];
    let tail = parents[(child + 1) % parents.len()];
    let mut genome = head.clone();
    let cut = rng.random_range(0..=genome.len());
    for (i, gene) in genome.iter_mut().enumerate().skip(cut) {
        if let Some(&value) = tail.get(i) {
            *gene = value;
        }
    }
    genome
}
