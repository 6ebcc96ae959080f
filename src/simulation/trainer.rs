//! Tick loop driving a population through successive generations.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::Result;
use super::params::Params;
use super::population::Population;
use super::track::{SegmentDescriptor, TrackCollisionField};

/// Statistics of a finished generation, taken just before breeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation number.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u32,
    /// Fitness of the best car.
    pub best_fitness: f32,
    /// Furthest distance driven by any car.
    pub best_distance: f32,
    /// Mean fitness over all cars.
    pub mean_fitness: f32,
    /// Last speed of the best car.
    pub best_speed: f32,
    /// Last turn rate of the best car.
    pub best_angular_velocity: f32,
}

impl GenerationSummary {
    fn from_population(population: &Population, ticks: u32) -> Self {
        let agents = population.agents();
        let mean_fitness = if agents.is_empty() {
            0.0
        } else {
            agents.iter().map(|a| a.fitness()).sum::<f32>() / agents.len() as f32
        };
        let best = population.best();

        Self {
            generation: population.generation(),
            ticks,
            best_fitness: best.map_or(0.0, |a| a.fitness()),
            best_distance: population.furthest().map_or(0.0, |a| a.distance()),
            mean_fitness,
            best_speed: best.map_or(0.0, |a| a.speed()),
            best_angular_velocity: best.map_or(0.0, |a| a.angular_velocity()),
        }
    }
}

/// Owns the track and population and advances them tick by tick.
#[derive(Debug, Clone)]
pub struct Trainer {
    field: TrackCollisionField,
    population: Population,
    /// 1-based tick index within the current generation.
    tick: u32,
}

impl Trainer {
    /// Builds the track and a seeded first generation.
    pub fn new(params: &Params, descriptors: &[SegmentDescriptor], seed: u64) -> Result<Self> {
        params.validate()?;
        let field = TrackCollisionField::new(descriptors, params.grid_size)?;
        let population = Population::with_seed(params, seed)?;

        Ok(Self {
            field,
            population,
            tick: 1,
        })
    }

    /// The collision field.
    pub fn field(&self) -> &TrackCollisionField {
        &self.field
    }

    /// The current generation.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Tick index the next call to [`Trainer::tick`] will use.
    pub fn tick_index(&self) -> u32 {
        self.tick
    }

    /// Advances the simulation by one tick.
    ///
    /// When the generation ends (every car dead, or the tick cap reached) the
    /// population is bred and the summary of the finished generation is
    /// returned.
    pub fn tick(&mut self) -> Result<Option<GenerationSummary>> {
        self.population.step(&self.field, self.tick)?;

        let capped = self
            .population
            .params()
            .max_ticks_per_generation
            .is_some_and(|cap| self.tick >= cap);
        if capped {
            self.population.kill_all();
        }

        if !self.population.all_dead() {
            self.tick += 1;
            return Ok(None);
        }

        let summary = GenerationSummary::from_population(&self.population, self.tick);
        info!(
            generation = summary.generation,
            ticks = summary.ticks,
            best_fitness = summary.best_fitness,
            best_distance = summary.best_distance,
            mean_fitness = summary.mean_fitness,
            capped,
            "generation finished"
        );

        self.population.evolve()?;
        self.tick = 1;
        Ok(Some(summary))
    }

    /// Runs ticks until the current generation finishes.
    pub fn run_generation(&mut self) -> Result<GenerationSummary> {
        loop {
            if let Some(summary) = self.tick()? {
                return Ok(summary);
            }
        }
    }

    /// Runs `generations` full generations.
    pub fn run(&mut self, generations: u32) -> Result<Vec<GenerationSummary>> {
        (0..generations).map(|_| self.run_generation()).collect()
    }
}
