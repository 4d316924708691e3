//! Activation functions with a per-node shape parameter.

use serde::{Deserialize, Serialize};

/// An activation function `f(weighted_sum, shape) -> output`.
pub type ActivationFn = fn(f32, f32) -> f32;

/// Named activation functions selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    /// `1 / (1 + e^(-n·x))`
    Sigmoid,
    /// `tanh(n·x)`
    Tanh,
    /// `e^(-(n·x)²)`
    Gaussian,
    /// `n·x`
    Linear,
    /// `x` for positive inputs, `n·x` otherwise.
    LeakyRelu,
    /// `sin(n·x)`
    Sine,
}

impl ActivationKind {
    /// The function implementing this activation.
    pub fn function(self) -> ActivationFn {
        match self {
            ActivationKind::Sigmoid => sigmoid,
            ActivationKind::Tanh => tanh,
            ActivationKind::Gaussian => gaussian,
            ActivationKind::Linear => linear,
            ActivationKind::LeakyRelu => leaky_relu,
            ActivationKind::Sine => sine,
        }
    }
}

/// Activation section of the network configuration: `{ "func": "tanh" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationParams {
    /// Selected function.
    pub func: ActivationKind,
}

impl Default for ActivationParams {
    fn default() -> Self {
        Self {
            func: ActivationKind::Tanh,
        }
    }
}

/// Logistic sigmoid with steepness `n`.
pub fn sigmoid(x: f32, n: f32) -> f32 {
    1.0 / (1.0 + (-n * x).exp())
}

/// Hyperbolic tangent with steepness `n`.
pub fn tanh(x: f32, n: f32) -> f32 {
    (n * x).tanh()
}

/// Gaussian bump with width `1 / n`.
pub fn gaussian(x: f32, n: f32) -> f32 {
    let z = n * x;
    (-z * z).exp()
}

/// Linear response with slope `n`.
pub fn linear(x: f32, n: f32) -> f32 {
    n * x
}

/// Leaky rectifier with negative slope `n`.
pub fn leaky_relu(x: f32, n: f32) -> f32 {
    if x > 0.0 { x } else { n * x }
}

/// Sine with frequency `n`.
pub fn sine(x: f32, n: f32) -> f32 {
    (n * x).sin()
}
