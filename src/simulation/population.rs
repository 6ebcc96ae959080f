//! Generation management, selection, and reproduction.
//!
//! All cars of a generation drive in parallel until every one of them has
//! crashed. The best few then breed the entire next generation.

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::agent::Agent;
use super::error::{Error, Result};
use super::genome::{self, Genome, Topology};
use super::params::Params;
use super::sensor::SensorArray;
use super::track::TrackCollisionField;

/// The current generation of cars.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    /// Agent indices sorted by fitness, best first.
    by_fitness: Vec<usize>,
    /// Agent indices sorted by distance, furthest first.
    by_distance: Vec<usize>,
    /// 1-based generation counter.
    generation: u32,
    sensors: SensorArray,
    params: Params,
    rng: ChaCha8Rng,
}

impl Population {
    /// Creates the first generation with random genomes.
    pub fn new(params: &Params, mut rng: ChaCha8Rng) -> Result<Self> {
        let topology = Topology::from_params(params);
        let genomes = (0..params.pop_size)
            .map(|_| Genome::random(topology, &mut rng))
            .collect();
        Self::from_genomes(params, genomes, rng)
    }

    /// Creates the first generation with a seeded random source.
    pub fn with_seed(params: &Params, seed: u64) -> Result<Self> {
        Self::new(params, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates the first generation from the given genomes.
    ///
    /// There must be exactly `params.pop_size` genomes.
    pub fn from_genomes(params: &Params, genomes: Vec<Genome>, rng: ChaCha8Rng) -> Result<Self> {
        params.validate()?;
        if genomes.len() != params.pop_size {
            return Err(Error::InvalidParams(format!(
                "expected {} genomes, got {}",
                params.pop_size,
                genomes.len()
            )));
        }

        let agents = genomes
            .into_iter()
            .map(|genome| Agent::new(genome, params))
            .collect::<Result<Vec<_>>>()?;

        let mut population = Self {
            agents,
            by_fitness: Vec::new(),
            by_distance: Vec::new(),
            generation: 1,
            sensors: SensorArray::new(params),
            params: params.clone(),
            rng,
        };
        population.sort();
        Ok(population)
    }

    /// Advances every car by one tick, then refreshes the orderings.
    ///
    /// Cars are updated in parallel; they only read the shared track.
    pub fn step(&mut self, field: &TrackCollisionField, tick_index: u32) -> Result<()> {
        let sensors = &self.sensors;
        let params = &self.params;

        self.agents
            .par_iter_mut()
            .try_for_each(|agent| agent.update(field, sensors, params, tick_index))?;

        self.sort();
        Ok(())
    }

    /// Returns `true` once every car has crashed.
    pub fn all_dead(&self) -> bool {
        self.agents.iter().all(|agent| !agent.is_alive())
    }

    /// Number of cars still driving.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Ends the generation for every remaining car.
    pub fn kill_all(&mut self) {
        for agent in &mut self.agents {
            agent.kill();
        }
    }

    /// Breeds the next generation from the fittest cars.
    ///
    /// Every child averages two distinct parents drawn from the top
    /// `num_parents`, then mutates. The new cars replace the old ones in a
    /// single assignment and the generation counter advances by one.
    pub fn evolve(&mut self) -> Result<()> {
        self.sort();

        let best_fitness = self.best().map_or(0.0, Agent::fitness);
        let magnitude = genome::mutation_magnitude(best_fitness, self.generation, &self.params);
        debug!(
            generation = self.generation,
            best_fitness, magnitude, "breeding next generation"
        );

        let parents: Vec<&Genome> = self
            .by_fitness
            .iter()
            .take(self.params.num_parents)
            .map(|&i| self.agents[i].genome())
            .collect();

        let mut offspring = Vec::with_capacity(self.params.pop_size);
        for _ in 0..self.params.pop_size {
            let pair = index::sample(&mut self.rng, parents.len(), 2);
            let mut child = Genome::crossover(parents[pair.index(0)], parents[pair.index(1)])?;
            child.mutate(best_fitness, self.generation, &self.params, &mut self.rng);
            offspring.push(Agent::new(child, &self.params)?);
        }

        self.agents = offspring;
        self.generation += 1;
        self.sort();

        info!(generation = self.generation, "started new generation");
        Ok(())
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// All cars in slot order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of cars.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns `true` if the population has no cars.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Cars ordered by fitness, best first.
    pub fn by_fitness(&self) -> impl Iterator<Item = &Agent> {
        self.by_fitness.iter().map(|&i| &self.agents[i])
    }

    /// Cars ordered by distance, furthest first.
    pub fn by_distance(&self) -> impl Iterator<Item = &Agent> {
        self.by_distance.iter().map(|&i| &self.agents[i])
    }

    /// The fittest car.
    pub fn best(&self) -> Option<&Agent> {
        self.by_fitness().next()
    }

    /// The car that has driven furthest.
    pub fn furthest(&self) -> Option<&Agent> {
        self.by_distance().next()
    }

    /// Parameters this population was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The sensor fan shared by all cars.
    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    /// Recomputes both orderings with a stable sort.
    fn sort(&mut self) {
        let agents = &self.agents;

        self.by_fitness = (0..agents.len()).collect();
        self.by_fitness
            .sort_by(|&a, &b| agents[b].fitness().total_cmp(&agents[a].fitness()));

        self.by_distance = (0..agents.len()).collect();
        self.by_distance
            .sort_by(|&a, &b| agents[b].distance().total_cmp(&agents[a].distance()));
    }
}
