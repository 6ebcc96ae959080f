//! # Trackevo - Neuroevolution Track Driving
//!
//! A population of simulated cars learns to drive around a track. Each car is
//! steered by a small feed-forward neural network whose weights are evolved by
//! a genetic algorithm.
//!
//! ## Features
//!
//! - Pixel-exact collision between cars and rotated track segments
//! - Uniform spatial grid for constant-time track lookups
//! - Ray-marched distance sensors
//! - Bias-free MLP controller with tanh activation
//! - Crossover and decaying Gaussian mutation
//! - Parallel per-tick agent updates using rayon
//! - Seeded, reproducible evolution
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Track segments and collision queries
//! - [`simulation::sensor`] - Distance sensors
//! - [`simulation::brain`] - Neural network controller
//! - [`simulation::genome`] - Evolvable weight vectors
//! - [`simulation::agent`] - Car state and per-tick behaviour
//! - [`simulation::population`] - Generations, selection and breeding
//! - [`simulation::trainer`] - Tick driver with generation rollover

/// Core simulation logic and data structures.
pub mod simulation {
    /// Car state machine and per-tick update.
    pub mod agent;
    /// Bias-free feed-forward neural network controller.
    pub mod brain;
    /// Error types shared by the simulation.
    pub mod error;
    /// Evolvable weight vectors with crossover and mutation.
    pub mod genome;
    /// Pixel occupancy masks for oriented rectangles.
    pub mod mask;
    /// Simulation parameters.
    pub mod params;
    /// Generation management, selection and reproduction.
    pub mod population;
    /// Ray-cast distance sensors.
    pub mod sensor;
    /// Uniform grid index over track segments.
    pub mod spatial;
    /// Track segments and the collision field built from them.
    pub mod track;
    /// Tick loop driving a population through successive generations.
    pub mod trainer;
}
