//! Genome codec: maps a network's trainable parameters to a flat vector in `[0, 1]`.
//!
//! Gene order is fixed for a topology: every link weight in creation order, then
//! every non-input node bias (layer-major, node-minor), then every shape parameter
//! `n` in the same node order. Each gene is its parameter linearly remapped from the
//! parameter's domain range into `[0, 1]`.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::error::{Result, SimError};
use super::Network;

/// A flat real-valued genome.
pub type Genome = Array1<f32>;

/// Closed domain range of one parameter kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Value encoded as gene 0.
    pub min: f32,
    /// Value encoded as gene 1.
    pub max: f32,
}

impl ParamRange {
    /// Creates a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Maps a domain value into gene space.
    #[inline]
    pub fn encode_value(self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }

    /// Maps a gene back into the domain.
    #[inline]
    pub fn decode_value(self, gene: f32) -> f32 {
        self.min + gene * (self.max - self.min)
    }

    /// Returns `true` when the range is finite and non-empty.
    pub fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Domain ranges for weights, biases and shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeRanges {
    /// Range of link weights.
    pub weight: ParamRange,
    /// Range of node biases.
    pub bias: ParamRange,
    /// Range of activation shape parameters.
    pub shape: ParamRange,
}

impl Default for GenomeRanges {
    fn default() -> Self {
        Self {
            weight: ParamRange::new(-4.0, 4.0),
            bias: ParamRange::new(-2.0, 2.0),
            shape: ParamRange::new(0.25, 4.0),
        }
    }
}

/// Encodes networks into genomes and decodes genomes back into networks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenomeCodec {
    ranges: GenomeRanges,
}

impl GenomeCodec {
    /// Creates a codec, rejecting empty or non-finite ranges.
    pub fn new(ranges: GenomeRanges) -> Result<Self> {
        for (name, range) in [
            ("weight", ranges.weight),
            ("bias", ranges.bias),
            ("shape", ranges.shape),
        ] {
            if !range.is_valid() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} range [{}, {}] must be finite with min < max",
                    range.min, range.max
                )));
            }
        }
        Ok(Self { ranges })
    }

    /// Ranges in use.
    pub fn ranges(&self) -> GenomeRanges {
        self.ranges
    }

    /// Draws a genome of the right length for `network`, each gene uniform in `[0, 1)`.
    pub fn create_random_genome<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Genome {
        (0..network.parameter_count())
            .map(|_| rng.random::<f32>())
            .collect()
    }

    /// Encodes the network's weights, biases and shape parameters.
    pub fn encode(&self, network: &Network) -> Genome {
        let ranges = self.ranges;
        let weights = network
            .links()
            .iter()
            .map(|link| ranges.weight.encode_value(link.weight));
        let biases = network
            .biased_nodes()
            .map(|node| ranges.bias.encode_value(node.bias));
        let shapes = network
            .biased_nodes()
            .map(|node| ranges.shape.encode_value(node.n));
        weights.chain(biases).chain(shapes).collect()
    }

    /// Writes a genome back into the network.
    ///
    /// Fails without touching the network when the genome length differs from
    /// [`Network::parameter_count`].
    pub fn decode(&self, network: &mut Network, genome: &Genome) -> Result<()> {
        let expected = network.parameter_count();
        if genome.len() != expected {
            return Err(SimError::GenomeLength {
                expected,
                actual: genome.len(),
            });
        }

        let ranges = self.ranges;
        let mut genes = genome.iter().copied();

        for weight in network.weights_mut() {
            if let Some(gene) = genes.next() {
                *weight = ranges.weight.decode_value(gene);
            }
        }
        for node in network.biased_nodes_mut() {
            if let Some(gene) = genes.next() {
                node.bias = ranges.bias.decode_value(gene);
            }
        }
        for node in network.biased_nodes_mut() {
            if let Some(gene) = genes.next() {
                node.n = ranges.shape.decode_value(gene);
            }
        }
        Ok(())
    }
}
