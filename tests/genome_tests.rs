#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::{Array1, array};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trackevo::simulation::brain::Brain;
use trackevo::simulation::error::Error;
use trackevo::simulation::genome::{Genome, Topology, mutation_magnitude};
use trackevo::simulation::params::Params;

#[test]
fn test_weight_count() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for (i, h, o) in [(3, 6, 2), (5, 16, 2), (1, 1, 1), (7, 3, 4)] {
        let genome = Genome::random(Topology::new(i, h, o), &mut rng);
        assert_eq!(genome.len(), i * h + h * o);
        assert!(genome.weights().iter().all(|w| (-1.0f32..=1.0).contains(w)));
    }
}

#[test]
fn test_from_weights_checks_length() {
    let topology = Topology::new(2, 2, 2);
    assert!(Genome::from_weights(topology, Array1::zeros(8)).is_ok());
    assert!(matches!(
        Genome::from_weights(topology, Array1::zeros(7)),
        Err(Error::TopologyMismatch { expected: 8, found: 7, .. })
    ));
}

#[test]
fn test_crossover_is_mean_and_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let topology = Topology::new(3, 6, 2);
    let a = Genome::random(topology, &mut rng);
    let b = Genome::random(topology, &mut rng);

    let first = Genome::crossover(&a, &b).unwrap();
    let second = Genome::crossover(&a, &b).unwrap();
    assert_eq!(first, second);

    for ((c, x), y) in first.weights().iter().zip(a.weights()).zip(b.weights()) {
        assert!((c - (x + y) / 2.0).abs() < 1e-6);
    }
}

#[test]
fn test_crossover_topology_mismatch() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let a = Genome::random(Topology::new(3, 6, 2), &mut rng);
    let b = Genome::random(Topology::new(3, 4, 2), &mut rng);

    assert!(matches!(
        Genome::crossover(&a, &b),
        Err(Error::TopologyMismatch { .. })
    ));
}

#[test]
fn test_mutation_bound() {
    let params = Params {
        mut_rate: 1.0,
        initial_mut_mag: 100.0,
        max_weight: 1.0,
        ..Params::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut genome = Genome::random(Topology::new(3, 6, 2), &mut rng);
    let original = genome.clone();

    genome.mutate(0.0, 0, &params, &mut rng);

    assert_ne!(genome, original);
    assert!(
        genome
            .weights()
            .iter()
            .all(|w| (-params.max_weight..=params.max_weight).contains(w))
    );
}

#[test]
fn test_zero_mutation_rate_keeps_weights() {
    let params = Params {
        mut_rate: 0.0,
        ..Params::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut genome = Genome::random(Topology::new(3, 6, 2), &mut rng);
    let original = genome.clone();

    genome.mutate(0.5, 3, &params, &mut rng);

    assert_eq!(genome, original);
}

#[test]
fn test_mutation_magnitude_schedule() {
    let params = Params::default();

    let start = mutation_magnitude(0.0, 0, &params);
    assert!((start - params.initial_mut_mag).abs() < 1e-6);

    // decays with generation
    let later = mutation_magnitude(0.0, 50, &params);
    let expected = params.initial_mut_mag * (-params.decay_rate * 50.0).exp();
    assert!((later - expected).abs() < 1e-6);
    assert!(later < start);

    // shrinks with fitness
    let fit = mutation_magnitude(1.0, 0, &params);
    let expected = params.initial_mut_mag / (1.0 + params.fitness_scale);
    assert!((fit - expected).abs() < 1e-6);

    // but never below a tenth
    let floor = mutation_magnitude(1_000.0, 0, &params);
    assert!((floor - params.initial_mut_mag * 0.1).abs() < 1e-6);
}

#[test]
fn test_seeded_mutation_is_reproducible() {
    let params = Params::default();
    let topology = Topology::new(3, 6, 2);

    let run = || {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut genome = Genome::random(topology, &mut rng);
        genome.mutate(0.2, 4, &params, &mut rng);
        genome
    };

    assert_eq!(run(), run());
}

#[test]
fn test_brain_zero_weights() {
    let genome = Genome::from_weights(Topology::new(3, 6, 2), Array1::zeros(30)).unwrap();
    let brain = Brain::from_genome(&genome).unwrap();

    let outputs = brain.think(&array![0.2, 0.5, 1.0]).unwrap();
    assert_eq!(outputs, array![0.0f32, 0.0]);
}

#[test]
fn test_brain_weight_layout() {
    // hidden = tanh(0.3 * x0 + 0.9 * x1), out = tanh(-0.5 * hidden)
    let genome = Genome::from_weights(Topology::new(2, 1, 1), array![0.3, 0.9, -0.5]).unwrap();
    let brain = Brain::from_genome(&genome).unwrap();

    let outputs = brain.think(&array![1.0, 0.0]).unwrap();
    let expected = (-0.5 * 0.3f32.tanh()).tanh();
    assert_eq!(outputs.len(), 1);
    assert!((outputs[0] - expected).abs() < 1e-6);

    let outputs = brain.think(&array![0.0, 1.0]).unwrap();
    let expected = (-0.5 * 0.9f32.tanh()).tanh();
    assert!((outputs[0] - expected).abs() < 1e-6);
}

#[test]
fn test_brain_outputs_bounded_and_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let genome = Genome::random(Topology::new(3, 6, 2), &mut rng);
    let brain = Brain::from_genome(&genome).unwrap();
    let inputs = array![0.13, 0.87, 0.5];

    let first = brain.think(&inputs).unwrap();
    for _ in 0..10 {
        let again = brain.think(&inputs).unwrap();
        assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            again.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|v| v.abs() < 1.0));
}

#[test]
fn test_brain_rejects_wrong_input_size() {
    let genome = Genome::from_weights(Topology::new(3, 6, 2), Array1::zeros(30)).unwrap();
    let brain = Brain::from_genome(&genome).unwrap();

    assert_eq!(brain.input_size(), 3);
    assert_eq!(brain.output_size(), 2);
    assert!(matches!(
        brain.think(&array![1.0, 2.0]),
        Err(Error::TopologyMismatch {
            expected: 3,
            found: 2,
            ..
        })
    ));
}
