//! Read-only view of the simulation for renderers.

use serde::{Deserialize, Serialize};

use super::geometric_utils::Segment;
use super::vector::Vec2;

/// Pose of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    /// Agent id.
    pub id: usize,
    /// Colour tag.
    pub color: [u8; 3],
    /// Particle positions; empty once the agent is dead.
    pub particles: Vec<Vec2>,
    /// Spring endpoints; empty once the agent is dead.
    pub springs: Vec<(Vec2, Vec2)>,
    /// Unit heading, zero once the agent is dead.
    pub heading: Vec2,
    /// Whether the agent is still being simulated.
    pub alive: bool,
}

/// Everything a renderer draws in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Current generation.
    pub generation: u32,
    /// Ticks into the current generation.
    pub tick: u64,
    /// Static walls.
    pub segments: Vec<Segment>,
    /// Every agent of the current generation, dead or alive.
    pub agents: Vec<AgentPose>,
}

impl WorldSnapshot {
    /// Agents still alive.
    pub fn alive(&self) -> impl Iterator<Item = &AgentPose> {
        self.agents.iter().filter(|pose| pose.alive)
    }
}
