//! Car behaviour, state, and lifecycle.
//!
//! A car senses the track, asks its brain for speed and steering, moves, and
//! dies as soon as it leaves the world or touches a track segment.

use geo::Point;
use ndarray::Array1;

use super::brain::Brain;
use super::error::{Error, Result};
use super::genome::{CONTROL_OUTPUTS, Genome};
use super::mask::Mask;
use super::params::Params;
use super::sensor::SensorArray;
use super::track::TrackCollisionField;

/// Liveness of a car within its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Still driving.
    Alive,
    /// Crashed or out of the world; frozen until the next generation.
    Dead,
}

/// A simulated car controlled by a neural network.
#[derive(Debug, Clone)]
pub struct Agent {
    genome: Genome,
    brain: Brain,
    pos: Point<f32>,
    /// Heading in degrees.
    heading: f32,
    speed: f32,
    angular_velocity: f32,
    distance: f32,
    fitness: f32,
    state: AgentState,
    /// Where each sensor ray stopped on the last tick.
    sensor_points: Vec<Point<f32>>,
    footprint: Mask,
}

impl Agent {
    /// Creates a live car at the configured start pose.
    ///
    /// Fails if the genome does not fit the sensor count or the two control
    /// outputs.
    pub fn new(genome: Genome, params: &Params) -> Result<Self> {
        let topology = genome.topology();
        if topology.inputs != params.sensor_angles.len() {
            return Err(Error::TopologyMismatch {
                what: "sensor inputs",
                expected: params.sensor_angles.len(),
                found: topology.inputs,
            });
        }
        if topology.outputs != CONTROL_OUTPUTS {
            return Err(Error::TopologyMismatch {
                what: "control outputs",
                expected: CONTROL_OUTPUTS,
                found: topology.outputs,
            });
        }

        let brain = Brain::from_genome(&genome)?;
        let pos = Point::new(params.agent_start[0], params.agent_start[1]);
        let heading = params.agent_start_heading;

        Ok(Self {
            genome,
            brain,
            pos,
            heading,
            speed: 0.0,
            angular_velocity: 0.0,
            distance: 0.0,
            fitness: 0.0,
            state: AgentState::Alive,
            sensor_points: Vec::new(),
            footprint: Mask::oriented_rect(pos, heading, params.agent_width, params.agent_height),
        })
    }

    /// Advances the car by one tick.
    ///
    /// Does nothing once the car is dead. `tick_index` is the 1-based tick
    /// count of the current generation.
    pub fn update(
        &mut self,
        field: &TrackCollisionField,
        sensors: &SensorArray,
        params: &Params,
        tick_index: u32,
    ) -> Result<()> {
        if !self.is_alive() {
            return Ok(());
        }

        let reading = sensors.cast(field, self.pos, self.heading);
        let outputs = self.brain.think(&Array1::from(reading.distances))?;
        self.sensor_points = reading.points;

        // map [-1, 1] onto the speed range
        let t = (outputs[0] + 1.0) / 2.0;
        self.speed = params.min_speed + (params.max_speed - params.min_speed) * t;
        self.angular_velocity = outputs[1] * params.max_ang_vel;

        self.heading += self.angular_velocity;
        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.pos = Point::new(self.pos.x() + cos * self.speed, self.pos.y() + sin * self.speed);
        self.footprint = Mask::oriented_rect(
            self.pos,
            self.heading,
            params.agent_width,
            params.agent_height,
        );

        if !self.in_world(params) || !field.is_clear(&self.footprint) {
            self.kill();
        }

        self.distance += self.speed;
        self.fitness = fitness(self.distance, tick_index, params);

        Ok(())
    }

    /// Marks the car as dead for the rest of the generation.
    pub fn kill(&mut self) {
        self.state = AgentState::Dead;
    }

    /// Checks if the car is still driving.
    pub fn is_alive(&self) -> bool {
        self.state == AgentState::Alive
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// The genome this car was built from.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// The controller network.
    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Center position.
    pub fn pos(&self) -> Point<f32> {
        self.pos
    }

    /// Heading in degrees.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Speed chosen on the last tick, in pixels per tick.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Turn applied on the last tick, in degrees.
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Total distance driven this generation.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Fitness as of the last tick.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// End points of the sensor rays from the last tick.
    pub fn sensor_points(&self) -> &[Point<f32>] {
        &self.sensor_points
    }

    /// Pixel footprint at the current pose.
    pub fn footprint(&self) -> &Mask {
        &self.footprint
    }

    fn in_world(&self, params: &Params) -> bool {
        (0.0..=params.world_width).contains(&self.pos.x())
            && (0.0..=params.world_height).contains(&self.pos.y())
    }
}

/// Fitness of a car that has driven `distance` over `tick_index` ticks.
///
/// Weighted sum of distance relative to the track length and average speed
/// relative to the maximum speed. Recomputed from scratch every tick and not
/// clamped, so it can exceed the weights' sum. A `tick_index` of zero counts
/// as one.
pub fn fitness(distance: f32, tick_index: u32, params: &Params) -> f32 {
    let avg_speed = distance / tick_index.max(1) as f32;

    let norm_distance = distance / params.track_length;
    let norm_avg_speed = avg_speed / params.max_speed;

    norm_distance * params.dist_weight + norm_avg_speed * params.avg_speed_weight
}
