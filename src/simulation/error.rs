//! Error types shared by the physics, brain, evolution and orchestration layers.

use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Degenerate geometry (zero-length springs or vectors) is never reported here:
/// it arises naturally while bodies move and is handled as a no-op.
#[derive(Debug, Error)]
pub enum SimError {
    /// A genome does not match the parameter count of the network it targets.
    #[error("genome length {actual} does not match network parameter count {expected}")]
    GenomeLength {
        /// Parameter count required by the network topology.
        expected: usize,
        /// Length of the genome that was supplied.
        actual: usize,
    },
    /// A network received an input vector of the wrong width.
    #[error("network expects {expected} inputs, got {actual}")]
    InputSize {
        /// Width of the network's input layer.
        expected: usize,
        /// Width of the supplied input vector.
        actual: usize,
    },
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A world handle no longer refers to a live object.
    #[error("unknown {0} handle")]
    UnknownHandle(&'static str),
    /// Reading a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
