//! Layered feed-forward neural network used as an agent's brain.
//!
//! Adjacent layers are fully connected by explicit [`Link`]s; there are no skip
//! connections and no recurrence. Every non-input node carries a bias and an
//! activation shape parameter `n`, and the activation function itself is injected
//! at construction.

use std::ops::Range;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod activation;
pub mod codec;

pub use activation::{ActivationFn, ActivationKind, ActivationParams};
pub use codec::{GenomeCodec, GenomeRanges, ParamRange};

use super::error::{Result, SimError};

/// Network section of the configuration: `{ "layers": [3, 6, 2], "activation": { "func": "tanh" } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Node count of every layer, input first.
    pub layers: Vec<usize>,
    /// Activation applied by every non-input node.
    #[serde(default)]
    pub activation: ActivationParams,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            layers: vec![5, 8, 4],
            activation: ActivationParams::default(),
        }
    }
}

/// A single neuron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Added to the weighted input sum.
    pub bias: f32,
    /// Shape parameter handed to the activation function.
    pub n: f32,
    /// Weighted input sum from the last forward pass.
    pub input: f32,
    /// Output from the last forward pass (the raw input for layer 0).
    pub output: f32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            bias: 0.0,
            n: 1.0,
            input: 0.0,
            output: 0.0,
        }
    }
}

/// An ordered group of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Nodes in evaluation order.
    pub nodes: Vec<Node>,
}

/// Position of a node inside the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Layer index, 0 for inputs.
    pub layer: usize,
    /// Node index within the layer.
    pub index: usize,
}

/// A weighted connection from one node to a node in the next layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Upstream node.
    pub from: NodeRef,
    /// Downstream node.
    pub to: NodeRef,
    /// Multiplier applied to the upstream output.
    pub weight: f32,
}

/// A strictly layered feed-forward network.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    links: Vec<Link>,
    /// Range of `links` feeding layer `i + 1`.
    spans: Vec<Range<usize>>,
    activation: ActivationFn,
}

impl Network {
    /// Builds a fully connected network with zero weights and biases and `n = 1`.
    ///
    /// Links are created layer by layer, upstream node major, downstream node minor.
    pub fn new(layer_sizes: &[usize], activation: ActivationFn) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(SimError::InvalidConfig(
                "network needs at least an input and an output layer".to_string(),
            ));
        }
        if let Some(index) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(SimError::InvalidConfig(format!("network layer {index} is empty")));
        }

        let layers: Vec<Layer> = layer_sizes
            .iter()
            .map(|&size| Layer {
                nodes: vec![Node::default(); size],
            })
            .collect();

        let mut links = Vec::new();
        let mut spans = Vec::with_capacity(layer_sizes.len() - 1);
        for (layer, pair) in layer_sizes.windows(2).enumerate() {
            let start = links.len();
            for from in 0..pair[0] {
                for to in 0..pair[1] {
                    links.push(Link {
                        from: NodeRef { layer, index: from },
                        to: NodeRef {
                            layer: layer + 1,
                            index: to,
                        },
                        weight: 0.0,
                    });
                }
            }
            spans.push(start..links.len());
        }

        Ok(Self {
            layers,
            links,
            spans,
            activation,
        })
    }

    /// Builds a network from its configuration section.
    pub fn from_params(params: &NetworkParams) -> Result<Self> {
        Self::new(&params.layers, params.activation.func.function())
    }

    /// Node count of every layer.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.nodes.len()).collect()
    }

    /// Width of the input layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].nodes.len()
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].nodes.len()
    }

    /// All layers, input first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// All links in creation order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Mutable link weights in creation order.
    ///
    /// Only weights are exposed; link endpoints are fixed by the layer sizes.
    pub fn weights_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.links.iter_mut().map(|link| &mut link.weight)
    }

    /// Nodes carrying a bias and shape parameter (every layer but the input),
    /// layer-major then node-minor.
    pub fn biased_nodes(&self) -> impl Iterator<Item = &Node> {
        self.layers[1..].iter().flat_map(|layer| layer.nodes.iter())
    }

    /// Mutable view of [`Network::biased_nodes`].
    pub fn biased_nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.layers[1..]
            .iter_mut()
            .flat_map(|layer| layer.nodes.iter_mut())
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Number of nodes with a bias.
    pub fn num_biased_nodes(&self) -> usize {
        self.layers[1..].iter().map(|layer| layer.nodes.len()).sum()
    }

    /// Length of a genome encoding this network: one gene per weight, bias and shape.
    pub fn parameter_count(&self) -> usize {
        self.num_links() + 2 * self.num_biased_nodes()
    }

    /// Replaces the activation function.
    pub fn set_activation(&mut self, activation: ActivationFn) {
        self.activation = activation;
    }

    /// Writes the input layer outputs directly; no activation is applied.
    pub fn set_input(&mut self, inputs: &[f32]) -> Result<()> {
        let expected = self.input_size();
        if inputs.len() != expected {
            return Err(SimError::InputSize {
                expected,
                actual: inputs.len(),
            });
        }
        for (node, &value) in self.layers[0].nodes.iter_mut().zip(inputs) {
            node.input = value;
            node.output = value;
        }
        Ok(())
    }

    /// Runs one forward pass over layers `1..`.
    pub fn run(&mut self) {
        let activation = self.activation;
        for (offset, span) in self.spans.iter().enumerate() {
            let (upstream, downstream) = self.layers.split_at_mut(offset + 1);
            let upstream = &upstream[offset];
            let layer = &mut downstream[0];

            for node in &mut layer.nodes {
                node.input = 0.0;
            }
            for link in &self.links[span.clone()] {
                layer.nodes[link.to.index].input +=
                    upstream.nodes[link.from.index].output * link.weight;
            }
            for node in &mut layer.nodes {
                node.output = activation(node.input + node.bias, node.n);
            }
        }
    }

    /// Outputs of the final layer in node order.
    pub fn output(&self) -> Array1<f32> {
        self.layers[self.layers.len() - 1]
            .nodes
            .iter()
            .map(|node| node.output)
            .collect()
    }

    /// Sets the inputs, runs a forward pass and returns the outputs.
    pub fn think(&mut self, inputs: &Array1<f32>) -> Result<Array1<f32>> {
        match inputs.as_slice() {
            Some(slice) => self.set_input(slice)?,
            None => self.set_input(&inputs.to_vec())?,
        }
        self.run();
        Ok(self.output())
    }
}
