//! Evolvable weight vectors for the car controller.
//!
//! A genome is the flat weight list of a fixed `(inputs, hidden, outputs)`
//! network. Children are produced by averaging two parents and then applying
//! Gaussian mutation whose strength decays over generations and as the
//! population improves.

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{Error, Result};
use super::params::Params;

/// Number of network outputs: speed command and steering command.
pub const CONTROL_OUTPUTS: usize = 2;

/// Lower bound on the fitness-based mutation factor.
const MIN_FITNESS_FACTOR: f32 = 0.1;

/// Layer sizes of the controller network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    /// Input neurons (one per sensor).
    pub inputs: usize,
    /// Hidden neurons.
    pub hidden: usize,
    /// Output neurons.
    pub outputs: usize,
}

impl Topology {
    /// Creates a topology from explicit layer sizes.
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Self {
        Self {
            inputs,
            hidden,
            outputs,
        }
    }

    /// The topology used for cars: one input per sensor, two outputs.
    pub fn from_params(params: &Params) -> Self {
        Self::new(params.sensor_angles.len(), params.hidden_size, CONTROL_OUTPUTS)
    }

    /// Layer sizes from input to output.
    pub fn layer_sizes(&self) -> [usize; 3] {
        [self.inputs, self.hidden, self.outputs]
    }

    /// Total number of weights (there are no biases).
    pub fn weight_count(&self) -> usize {
        self.inputs * self.hidden + self.hidden * self.outputs
    }
}

/// Flat, ordered weight vector of a controller network.
///
/// Weights are laid out layer by layer, output neuron by output neuron, input
/// neuron by input neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    topology: Topology,
    weights: Array1<f32>,
}

impl Genome {
    /// Creates a genome with weights drawn uniformly from `[-1, 1]`.
    pub fn random<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Self {
        let weights = Array1::from_shape_fn(topology.weight_count(), |_| {
            rng.random_range(-1.0f32..=1.0)
        });
        Self { topology, weights }
    }

    /// Wraps an existing weight vector.
    ///
    /// Fails if the length does not match the topology.
    pub fn from_weights(topology: Topology, weights: Array1<f32>) -> Result<Self> {
        if weights.len() != topology.weight_count() {
            return Err(Error::TopologyMismatch {
                what: "genome weight count",
                expected: topology.weight_count(),
                found: weights.len(),
            });
        }
        Ok(Self { topology, weights })
    }

    /// Layer sizes of the network this genome encodes.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The flat weight vector.
    pub fn weights(&self) -> &Array1<f32> {
        &self.weights
    }

    /// Number of weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if the genome has no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Creates a child whose weights are the element-wise mean of both parents.
    pub fn crossover(parent1: &Genome, parent2: &Genome) -> Result<Self> {
        if parent1.topology != parent2.topology {
            return Err(Error::TopologyMismatch {
                what: "crossover parents",
                expected: parent1.topology.weight_count(),
                found: parent2.topology.weight_count(),
            });
        }

        Ok(Self {
            topology: parent1.topology,
            weights: (&parent1.weights + &parent2.weights) / 2.0,
        })
    }

    /// Perturbs a random subset of weights with Gaussian noise.
    ///
    /// Each weight is hit with probability `params.mut_rate`; the noise standard
    /// deviation comes from [`mutation_magnitude`]. Results are clamped to
    /// `[-params.max_weight, params.max_weight]`.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        best_fitness: f32,
        generation: u32,
        params: &Params,
        rng: &mut R,
    ) {
        let magnitude = mutation_magnitude(best_fitness, generation, params);
        let noise = match Normal::new(0.0, magnitude) {
            Ok(noise) => noise,
            Err(e) => {
                warn!(magnitude, error = %e, "skipping mutation with unusable magnitude");
                return;
            }
        };

        let bound = params.max_weight;
        for weight in &mut self.weights {
            if rng.random::<f32>() < params.mut_rate {
                *weight = (*weight + noise.sample(rng)).clamp(-bound, bound);
            }
        }
    }
}

/// Standard deviation of mutation noise.
///
/// Decays exponentially with `generation` and shrinks as `best_fitness` grows,
/// but never drops below a tenth of the generational value.
pub fn mutation_magnitude(best_fitness: f32, generation: u32, params: &Params) -> f32 {
    let decayed = params.initial_mut_mag * (-params.decay_rate * generation as f32).exp();
    let fitness_factor = (1.0 / (1.0 + best_fitness * params.fitness_scale)).max(MIN_FITNESS_FACTOR);
    decayed * fitness_factor
}
