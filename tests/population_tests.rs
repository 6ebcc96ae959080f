#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trackevo::simulation::error::Error;
use trackevo::simulation::genome::{Genome, Topology};
use trackevo::simulation::params::Params;
use trackevo::simulation::population::Population;
use trackevo::simulation::track::{SegmentDescriptor, TrackCollisionField};

fn create_test_params() -> Params {
    Params {
        world_width: 400.0,
        world_height: 400.0,
        grid_size: 50,
        agent_width: 10.0,
        agent_height: 6.0,
        agent_start: [200.0, 200.0],
        agent_start_heading: 0.0,
        max_sensor_dist: 100.0,
        ray_step: 5.0,
        hidden_size: 4,
        pop_size: 6,
        num_parents: 2,
        max_ticks_per_generation: Some(50),
        ..Params::default()
    }
}

fn open_track() -> TrackCollisionField {
    let far = SegmentDescriptor {
        x: 20.0,
        y: 380.0,
        angle: 0.0,
        width: 10.0,
        height: 10.0,
    };
    TrackCollisionField::new(&[far], 50).unwrap()
}

#[test]
fn test_population_creation() {
    let params = create_test_params();
    let population = Population::with_seed(&params, 1).unwrap();

    assert_eq!(population.len(), params.pop_size);
    assert_eq!(population.generation(), 1);
    assert_eq!(population.alive_count(), params.pop_size);
    assert!(!population.all_dead());
    assert_eq!(population.sensors().len(), params.sensor_angles.len());
}

#[test]
fn test_generation_rollover() {
    let params = create_test_params();
    let mut population = Population::with_seed(&params, 2).unwrap();

    population.kill_all();
    assert!(population.all_dead());

    population.evolve().unwrap();

    assert_eq!(population.len(), params.pop_size);
    assert_eq!(population.generation(), 2);
    assert!(!population.all_dead());
    for agent in population.agents() {
        assert!(agent.is_alive());
        assert_eq!(agent.distance(), 0.0);
        assert_eq!(agent.pos().x(), params.agent_start[0]);
        assert_eq!(agent.pos().y(), params.agent_start[1]);
        assert!(
            agent
                .genome()
                .weights()
                .iter()
                .all(|w| w.abs() <= params.max_weight)
        );
    }
}

#[test]
fn test_step_orders_by_fitness_and_distance() {
    let params = create_test_params();
    let field = open_track();
    let mut population = Population::with_seed(&params, 3).unwrap();

    for tick in 1..=3 {
        population.step(&field, tick).unwrap();
    }

    let fitness: Vec<f32> = population.by_fitness().map(|a| a.fitness()).collect();
    assert_eq!(fitness.len(), params.pop_size);
    assert!(fitness.windows(2).all(|w| w[0] >= w[1]));

    let distance: Vec<f32> = population.by_distance().map(|a| a.distance()).collect();
    assert!(distance.windows(2).all(|w| w[0] >= w[1]));

    let best = population.best().unwrap().fitness();
    assert!(population.agents().iter().all(|a| a.fitness() <= best));
    assert_eq!(
        population.furthest().unwrap().distance(),
        distance[0]
    );
}

#[test]
fn test_children_average_the_top_parents() {
    let params = Params {
        mut_rate: 0.0,
        ..create_test_params()
    };
    let field = open_track();
    let mut population = Population::with_seed(&params, 4).unwrap();
    population.step(&field, 1).unwrap();

    let ranked: Vec<&Genome> = population.by_fitness().map(|a| a.genome()).collect();
    let expected = Genome::crossover(ranked[0], ranked[1]).unwrap();

    population.evolve().unwrap();

    for agent in population.agents() {
        assert_eq!(agent.genome(), &expected);
    }
}

#[test]
fn test_seeded_evolution_is_reproducible() {
    let params = create_test_params();
    let field = open_track();

    let run = || {
        let mut population = Population::with_seed(&params, 42).unwrap();
        population.step(&field, 1).unwrap();
        population.evolve().unwrap();
        population
            .agents()
            .iter()
            .map(|a| a.genome().clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_from_genomes_requires_full_population() {
    let params = create_test_params();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let genomes = vec![Genome::random(Topology::from_params(&params), &mut rng)];

    let result = Population::from_genomes(&params, genomes, rng);
    assert!(matches!(result, Err(Error::InvalidParams(_))));
}

#[test]
fn test_invalid_parent_count() {
    let params = Params {
        num_parents: 1,
        ..create_test_params()
    };
    assert!(matches!(
        Population::with_seed(&params, 6),
        Err(Error::InvalidParams(_))
    ));
}
