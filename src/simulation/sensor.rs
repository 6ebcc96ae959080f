//! Ray-cast distance sensors.
//!
//! Each ray is marched outward in fixed steps and stops at the first sample
//! that leaves the world or lands on the track.

use geo::{Coord, Point};

use super::params::Params;
use super::track::TrackCollisionField;

/// Normalized distances and impact points, one per ray, in sensor order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    /// Hit distance divided by the sensor range, in `[0, 1]`.
    pub distances: Vec<f32>,
    /// Sample where each ray stopped, or its unobstructed end point.
    pub points: Vec<Point<f32>>,
}

/// A fixed fan of distance sensors.
#[derive(Debug, Clone)]
pub struct SensorArray {
    angles: Vec<f32>,
    max_distance: f32,
    ray_step: f32,
    world_width: f32,
    world_height: f32,
}

impl SensorArray {
    /// Creates the sensor fan described by `params`.
    pub fn new(params: &Params) -> Self {
        Self {
            angles: params.sensor_angles.clone(),
            max_distance: params.max_sensor_dist,
            ray_step: params.ray_step,
            world_width: params.world_width,
            world_height: params.world_height,
        }
    }

    /// Number of rays.
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Returns `true` if the array has no rays.
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Ray angles in degrees, relative to the heading.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Casts every ray from `position` with the car facing `heading` degrees.
    pub fn cast(
        &self,
        field: &TrackCollisionField,
        position: Point<f32>,
        heading: f32,
    ) -> SensorReading {
        let mut reading = SensorReading {
            distances: Vec::with_capacity(self.angles.len()),
            points: Vec::with_capacity(self.angles.len()),
        };

        for offset in &self.angles {
            let (sin, cos) = (heading + offset).to_radians().sin_cos();
            let (distance, point) = self.cast_ray(field, position, Coord { x: cos, y: sin });

            reading.distances.push(distance / self.max_distance);
            reading.points.push(point);
        }

        reading
    }

    /// Marches a single ray and returns its raw hit distance and point.
    fn cast_ray(
        &self,
        field: &TrackCollisionField,
        origin: Point<f32>,
        direction: Coord<f32>,
    ) -> (f32, Point<f32>) {
        let sample = |distance: f32| {
            Point::new(
                (origin.x() + direction.x * distance).floor(),
                (origin.y() + direction.y * distance).floor(),
            )
        };

        let steps = (self.max_distance / self.ray_step).ceil() as usize;
        for i in 0..steps {
            let distance = i as f32 * self.ray_step;
            if distance >= self.max_distance {
                break;
            }

            let point = sample(distance);
            if !self.in_world(point) || field.point_blocked(point) {
                return (distance, point);
            }
        }

        (self.max_distance, sample(self.max_distance))
    }

    fn in_world(&self, point: Point<f32>) -> bool {
        (0.0..self.world_width).contains(&point.x()) && (0.0..self.world_height).contains(&point.y())
    }
}
