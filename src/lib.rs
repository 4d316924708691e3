//! # Roboevo - Neuroevolution of Soft-Bodied Robots
//!
//! A generation-based simulation in which spring-and-particle robots, steered by small
//! feed-forward neural networks, learn to move through a fluid. Brains are evolved by a
//! genetic algorithm; bodies are simulated by an impulse-based physics engine and see
//! their surroundings through a fan of ray casts.
//!
//! ## Features
//!
//! - Impulse-based 2D physics with soft linear and angular springs
//! - Aerodynamic drag and lift on body segments
//! - Ray-casting vision against static walls
//! - Layered feed-forward networks with per-node activation shape
//! - Genome codec mapping networks to flat vectors in `[0, 1]`
//! - Genetic algorithm with elitism, gemmation, selection, crossover and mutation
//! - Worm, blob and crab body plans
//! - JSON configuration and serializable snapshots for renderers
//!
//! ## Core Modules
//!
//! - [`simulation::physics`] - Particles, springs and the solver
//! - [`simulation::raycast`] - Rays and the ray camera
//! - [`simulation::brain`] - Neural network and genome codec
//! - [`simulation::evolution`] - Genetic algorithm
//! - [`simulation::agent`] - Bodies and agents
//! - [`simulation::ecosystem`] - Main simulation loop

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agents: bodies, brains and cameras.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Main simulation loop and generation turnover.
    pub mod ecosystem;
    /// Error type shared by every module.
    pub mod error;
    /// Genetic algorithm engine.
    pub mod evolution;
    /// Geometric utility functions for distance calculations.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Impulse-based particle physics.
    pub mod physics;
    /// Ray casting and the ray camera.
    pub mod raycast;
    /// Read-only world snapshots for renderers.
    pub mod snapshot;
    /// Per-generation fitness statistics.
    pub mod stats;
    /// 2D vector math.
    pub mod vector;
}
