//! Track segments and the collision field built from them.
//!
//! The track is a fixed set of rotated rectangles. Once built, the field is
//! read-only and shared by every car for the whole run, so it can be borrowed
//! across rayon workers without locking.

use std::path::Path;

use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{Result, TrackLoadError};
use super::mask::{Mask, PixelRect};
use super::spatial::SpatialIndex;

/// A track segment as stored by the track editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    /// Center x coordinate.
    pub x: f32,
    /// Center y coordinate.
    pub y: f32,
    /// Clockwise rotation in degrees.
    pub angle: f32,
    /// Extent along the rotated x axis.
    pub width: f32,
    /// Extent along the rotated y axis.
    pub height: f32,
}

impl SegmentDescriptor {
    fn check(&self) -> std::result::Result<(), &'static str> {
        if ![self.x, self.y, self.angle, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err("coordinates must be finite");
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("width and height must be positive");
        }
        Ok(())
    }
}

/// An immutable oriented rectangle with its precomputed pixel mask.
#[derive(Debug, Clone)]
pub struct TrackSegment {
    descriptor: SegmentDescriptor,
    mask: Mask,
}

impl TrackSegment {
    /// Rasterizes a segment from its descriptor.
    pub fn new(descriptor: SegmentDescriptor) -> Self {
        let mask = Mask::oriented_rect(
            Point::new(descriptor.x, descriptor.y),
            descriptor.angle,
            descriptor.width,
            descriptor.height,
        );
        Self { descriptor, mask }
    }

    /// The descriptor this segment was built from.
    pub fn descriptor(&self) -> &SegmentDescriptor {
        &self.descriptor
    }

    /// Pixel occupancy of the segment.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Axis-aligned bounding rectangle in world pixels.
    pub fn bounds(&self) -> PixelRect {
        self.mask.bounds()
    }
}

/// All track segments plus the grid used to find them quickly.
#[derive(Debug, Clone)]
pub struct TrackCollisionField {
    segments: Vec<TrackSegment>,
    index: SpatialIndex,
}

impl TrackCollisionField {
    /// Builds the field from parsed segment descriptors.
    ///
    /// Segment ids are the positions in `descriptors` and stay stable for the
    /// lifetime of the field.
    ///
    /// # Arguments
    ///
    /// * `descriptors` - Track segments in load order
    /// * `grid_size` - Side length of a spatial grid cell
    ///
    /// # Returns
    ///
    /// The field, or a [`TrackLoadError`] if the track is empty or a segment
    /// has unusable geometry.
    pub fn new(descriptors: &[SegmentDescriptor], grid_size: i32) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(TrackLoadError::Empty.into());
        }

        let mut index = SpatialIndex::new(grid_size)?;
        let mut segments = Vec::with_capacity(descriptors.len());

        for (i, descriptor) in descriptors.iter().enumerate() {
            descriptor
                .check()
                .map_err(|reason| TrackLoadError::InvalidSegment { index: i, reason })?;

            let segment = TrackSegment::new(*descriptor);
            index.insert(i, &segment.bounds());
            segments.push(segment);
        }

        info!(
            segments = segments.len(),
            cells = index.cell_count(),
            "built track collision field"
        );

        Ok(Self { segments, index })
    }

    /// All segments, indexed by id.
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// The spatial grid over the segments.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Returns `true` if `shape` does not touch any track segment.
    pub fn is_clear(&self, shape: &Mask) -> bool {
        let bounds = shape.bounds();

        self.index
            .query_region(&bounds)
            .into_iter()
            .map(|id| &self.segments[id])
            .filter(|segment| segment.bounds().intersects(&bounds))
            .all(|segment| !shape.overlaps(segment.mask()))
    }

    /// Returns `true` if the pixel under `point` belongs to a track segment.
    pub fn point_blocked(&self, point: Point<f32>) -> bool {
        let x = point.x().floor() as i32;
        let y = point.y().floor() as i32;

        self.index
            .query_point(x, y)
            .iter()
            .any(|&id| self.segments[id].mask().contains_pixel(x, y))
    }
}

/// Parses a JSON list of segment descriptors.
pub fn parse_descriptors(json: &str) -> std::result::Result<Vec<SegmentDescriptor>, TrackLoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a JSON track file written by the track editor.
pub fn load_descriptors(
    path: impl AsRef<Path>,
) -> std::result::Result<Vec<SegmentDescriptor>, TrackLoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| TrackLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptors = parse_descriptors(&json)?;
    info!(count = descriptors.len(), path = %path.display(), "loaded track segments");
    Ok(descriptors)
}
