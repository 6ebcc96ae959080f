use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Simulation parameters that control world geometry, sensing and evolution.
///
/// Every constant the engine uses is read from here, so a run can be scaled
/// down for tests or loaded from a JSON file with only a few overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// World width in pixels. Cars and sensor rays must stay below it.
    pub world_width: f32,
    /// World height in pixels.
    pub world_height: f32,
    /// Side length of a spatial grid cell in pixels.
    pub grid_size: i32,
    /// Approximate distance from start to finish, used to normalize distance.
    pub track_length: f32,
    /// Number of cars per generation.
    pub pop_size: usize,
    /// Number of top cars used as parents for the next generation.
    pub num_parents: usize,
    /// Car length along its heading.
    pub agent_width: f32,
    /// Car width across its heading.
    pub agent_height: f32,
    /// Spawn position of every car.
    pub agent_start: [f32; 2],
    /// Spawn heading in degrees (0 points along +x, 90 along +y).
    pub agent_start_heading: f32,
    /// Sensor ray angles in degrees, relative to the car heading.
    pub sensor_angles: Vec<f32>,
    /// Maximum sensor ray length.
    pub max_sensor_dist: f32,
    /// Distance between consecutive samples along a ray.
    pub ray_step: f32,
    /// Maximum turn per tick in degrees.
    pub max_ang_vel: f32,
    /// Maximum speed in pixels per tick.
    pub max_speed: f32,
    /// Minimum speed in pixels per tick.
    pub min_speed: f32,
    /// Fitness weight of normalized distance.
    pub dist_weight: f32,
    /// Fitness weight of normalized average speed.
    pub avg_speed_weight: f32,
    /// Probability that a single weight is perturbed during mutation.
    pub mut_rate: f32,
    /// Absolute bound on every network weight after mutation.
    pub max_weight: f32,
    /// Mutation standard deviation at generation zero.
    pub initial_mut_mag: f32,
    /// Exponential decay of the mutation magnitude per generation.
    pub decay_rate: f32,
    /// How quickly the mutation magnitude shrinks as the best fitness grows.
    pub fitness_scale: f32,
    /// Number of hidden neurons.
    pub hidden_size: usize,
    /// Default number of generations for a training run.
    pub num_generations: u32,
    /// Ticks after which a generation is forcibly ended. `None` runs until all cars die.
    pub max_ticks_per_generation: Option<u32>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 3200.0,
            world_height: 1800.0,
            grid_size: 150,
            track_length: 7000.0,
            pop_size: 10,
            num_parents: 2,
            agent_width: 35.0,
            agent_height: 22.0,
            agent_start: [120.0, 50.0],
            agent_start_heading: 90.0,
            sensor_angles: vec![-45.0, 0.0, 45.0],
            max_sensor_dist: 250.0,
            ray_step: 5.0,
            max_ang_vel: 2.0,
            max_speed: 7.0,
            min_speed: 3.0,
            dist_weight: 1.0,
            avg_speed_weight: 0.3,
            mut_rate: 0.4,
            max_weight: 1.0,
            initial_mut_mag: 2.0,
            decay_rate: 0.03,
            fitness_scale: 1.7,
            hidden_size: 6,
            num_generations: 100,
            max_ticks_per_generation: Some(10_000),
        }
    }
}

impl Params {
    /// Checks that the parameters describe a runnable simulation.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidParams(format!("{name} must be positive, got {value}")))
            }
        }

        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("track_length", self.track_length)?;
        positive("agent_width", self.agent_width)?;
        positive("agent_height", self.agent_height)?;
        positive("max_sensor_dist", self.max_sensor_dist)?;
        positive("ray_step", self.ray_step)?;
        positive("max_speed", self.max_speed)?;

        if self.grid_size <= 0 {
            return Err(Error::InvalidParams("grid_size must be positive".into()));
        }
        if !(0.0..=self.max_speed).contains(&self.min_speed) {
            return Err(Error::InvalidParams(
                "min_speed must lie in [0, max_speed]".into(),
            ));
        }
        if self.sensor_angles.is_empty() {
            return Err(Error::InvalidParams("at least one sensor is required".into()));
        }
        if self.hidden_size == 0 {
            return Err(Error::InvalidParams("hidden_size must be non-zero".into()));
        }
        if self.num_parents < 2 || self.num_parents > self.pop_size {
            return Err(Error::InvalidParams(format!(
                "num_parents must lie in [2, pop_size={}], got {}",
                self.pop_size, self.num_parents
            )));
        }
        if !(0.0..=1.0).contains(&self.mut_rate) {
            return Err(Error::InvalidParams("mut_rate must lie in [0, 1]".into()));
        }
        if !(self.max_weight.is_finite() && self.max_weight >= 0.0) {
            return Err(Error::InvalidParams("max_weight must be non-negative".into()));
        }
        if !(self.initial_mut_mag.is_finite() && self.initial_mut_mag >= 0.0) {
            return Err(Error::InvalidParams(
                "initial_mut_mag must be non-negative".into(),
            ));
        }
        if !(self.decay_rate.is_finite() && self.fitness_scale.is_finite()) {
            return Err(Error::InvalidParams(
                "decay_rate and fitness_scale must be finite".into(),
            ));
        }
        if self.max_ticks_per_generation == Some(0) {
            return Err(Error::InvalidParams(
                "max_ticks_per_generation must be non-zero".into(),
            ));
        }

        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields fall back to [`Params::default`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
